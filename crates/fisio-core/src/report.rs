//! Report read models — never stored, always derived.
//!
//! The aggregation buckets are independent, possibly-overlapping sets: an
//! injury that both started and ended within the window appears in both
//! `nuevas_lesiones` and `lesiones_finalizadas`. No ordering is imposed on
//! the buckets; display ordering is the caller's concern.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  injury::Injury, period::ReportPeriod, player::Player,
  status::DailyStatusEntry,
};

/// The player attributes list and report screens render next to an injury.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerDisplay {
  pub player_id: Uuid,
  pub name:      String,
  pub division:  String,
  pub rut:       String,
}

impl From<&Player> for PlayerDisplay {
  fn from(p: &Player) -> Self {
    Self {
      player_id: p.player_id,
      name:      p.name.clone(),
      division:  p.division.clone(),
      rut:       p.rut.clone(),
    }
  }
}

/// An injury joined with its owning player's display attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InjuryWithPlayer {
  #[serde(flatten)]
  pub injury: Injury,
  #[serde(rename = "jugador")]
  pub player: PlayerDisplay,
}

/// A daily entry annotated with its owning injury's display context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryWithContext {
  #[serde(flatten)]
  pub entry:     DailyStatusEntry,
  #[serde(rename = "diagnostico")]
  pub diagnosis: String,
  #[serde(rename = "jugador")]
  pub player:    PlayerDisplay,
}

/// Counts of the three aggregation buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
  #[serde(rename = "nuevas_lesiones")]
  pub new_injuries:       usize,
  #[serde(rename = "lesiones_finalizadas")]
  pub finalized_injuries: usize,
  #[serde(rename = "cambios_diarios")]
  pub daily_changes:      usize,
}

/// The full informe payload for one period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodReport {
  #[serde(rename = "periodo")]
  pub period:             ReportPeriod,
  #[serde(rename = "nuevas_lesiones")]
  pub new_injuries:       Vec<InjuryWithPlayer>,
  #[serde(rename = "lesiones_finalizadas")]
  pub finalized_injuries: Vec<InjuryWithPlayer>,
  #[serde(rename = "cambios_diarios")]
  pub daily_changes:      Vec<EntryWithContext>,
  #[serde(rename = "resumen")]
  pub summary:            ReportSummary,
}
