//! Player — roster identity and administrative attributes.
//!
//! Players are never deleted, only deactivated; their clinical history must
//! remain reachable after they leave the squad.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A squad member. Wire names match what the frontend consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
  pub player_id:  Uuid,
  pub name:       String,
  /// National identity number.
  pub rut:        String,
  #[serde(rename = "fecha_nacimiento")]
  pub birth_date: NaiveDate,
  pub division:   String,
  /// Path reference to the profile photo; the binary lives elsewhere.
  #[serde(rename = "foto")]
  pub photo:      Option<String>,
  #[serde(rename = "activo")]
  pub active:     bool,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::ClinicalStore::add_player`].
/// The UUID, `active` flag, and `created_at` are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewPlayer {
  pub name:       String,
  pub rut:        String,
  pub birth_date: NaiveDate,
  pub division:   String,
  pub photo:      Option<String>,
}
