//! Daily status entries — the per-day recovery-state timeline of an injury.
//!
//! Entries are append-only. The UI never edits or deletes a past entry; the
//! core business rule is at most one entry per (injury, date) pair.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where the player is in their recovery on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryState {
  /// Table treatment.
  Camilla,
  /// Gym rehabilitation.
  Gimnasio,
  /// Return to sport.
  Reintegro,
}

/// One recovery-state observation for one injury on one calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyStatusEntry {
  pub entry_id:    Uuid,
  pub injury_id:   Uuid,
  /// Calendar date of the observation, local convention, no time component.
  #[serde(rename = "fecha")]
  pub date:        NaiveDate,
  #[serde(rename = "estado")]
  pub state:       RecoveryState,
  #[serde(rename = "observacion")]
  pub observation: Option<String>,
  /// Staff member who recorded the observation; required for audit.
  #[serde(rename = "registrado_por")]
  pub recorded_by: String,
  /// Server-assigned timestamp; never changes after creation.
  pub recorded_at: DateTime<Utc>,
}

/// Input to [`crate::store::ClinicalStore::insert_daily_entry`].
/// `entry_id` and `recorded_at` are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewDailyStatus {
  pub injury_id:   Uuid,
  pub date:        NaiveDate,
  pub state:       RecoveryState,
  pub observation: Option<String>,
  pub recorded_by: String,
}

impl NewDailyStatus {
  /// Convenience constructor with no observation text.
  pub fn new(
    injury_id: Uuid,
    date: NaiveDate,
    state: RecoveryState,
    recorded_by: impl Into<String>,
  ) -> Self {
    Self {
      injury_id,
      date,
      state,
      observation: None,
      recorded_by: recorded_by.into(),
    }
  }
}
