//! Injury — one clinical episode for a player, tracked from onset to
//! recovery.
//!
//! An injury has exactly two states, `ACTIVE → FINALIZED`, with a single
//! directed edge and no return edge. While active it has no end date; once
//! finalized it is immutable except for read.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Classification enums ────────────────────────────────────────────────────

/// Coarse clinical classification of the injured tissue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InjuryType {
  Muscular,
  Articular,
  Osea,
  Ligamentosa,
  Tendinosa,
  Otra,
}

/// Severity class assigned at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  Leve,
  Moderada,
  Grave,
}

// ─── Injury ──────────────────────────────────────────────────────────────────

/// One clinical episode. Belongs to exactly one player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Injury {
  pub injury_id:   Uuid,
  pub player_id:   Uuid,
  #[serde(rename = "diagnostico")]
  pub diagnosis:   String,
  #[serde(rename = "tipo")]
  pub injury_type: InjuryType,
  #[serde(rename = "region")]
  pub body_region: String,
  #[serde(rename = "gravedad")]
  pub severity:    Severity,
  #[serde(rename = "mecanismo")]
  pub mechanism:   String,
  #[serde(rename = "dias_recuperacion_estimados")]
  pub estimated_recovery_days: u32,
  /// Calendar date of onset, local convention.
  #[serde(rename = "fecha_lesion")]
  pub start_date:  NaiveDate,
  /// Set only by the finalize transition. `None` while active.
  #[serde(rename = "fecha_fin")]
  pub end_date:    Option<NaiveDate>,
  /// Inclusive day count from start to end; computed at finalization.
  #[serde(rename = "dias_recuperacion_reales")]
  pub actual_recovery_days: Option<i64>,
  #[serde(rename = "esta_activa")]
  pub active:      bool,
}

/// Input to [`crate::store::ClinicalStore::add_injury`].
/// New injuries always start active with no end date.
#[derive(Debug, Clone)]
pub struct NewInjury {
  pub player_id:   Uuid,
  pub diagnosis:   String,
  pub injury_type: InjuryType,
  pub body_region: String,
  pub severity:    Severity,
  pub mechanism:   String,
  pub estimated_recovery_days: u32,
  pub start_date:  NaiveDate,
}

/// Inclusive day count between onset and recovery: a same-day injury counts
/// as one day of recovery, not zero.
pub fn inclusive_recovery_days(start: NaiveDate, end: NaiveDate) -> i64 {
  end.signed_duration_since(start).num_days() + 1
}
