//! Handlers for post-match checklist endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/checklists` | One per (player, match); 422 on rule violation |
//! | `GET`  | `/players/:id/checklists` | All checklists for a player |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use fisio_core::{
  checklist::{NewChecklist, PostMatchChecklist},
  store::ClinicalStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /checklists`.
#[derive(Debug, Deserialize)]
pub struct CreateChecklistBody {
  pub player_id:  Uuid,
  pub match_id:   Uuid,
  #[serde(rename = "fecha_partido")]
  pub match_date: NaiveDate,
  #[serde(rename = "dolor")]
  pub has_pain:   bool,
  #[serde(rename = "intensidad_dolor")]
  pub pain_intensity: Option<u8>,
  #[serde(rename = "zona_dolor")]
  pub pain_zone:  Option<String>,
  #[serde(rename = "mecanismo")]
  pub mechanism:  Option<String>,
  #[serde(rename = "fase_aparicion")]
  pub phase_of_appearance: Option<String>,
  #[serde(rename = "diagnostico_presuntivo")]
  pub presumptive_diagnosis: Option<String>,
  #[serde(rename = "tratamiento_inmediato")]
  pub immediate_treatment: Option<String>,
  #[serde(rename = "observaciones")]
  pub observations: Option<String>,
  #[serde(rename = "registrado_por")]
  pub recorded_by: String,
}

impl From<CreateChecklistBody> for NewChecklist {
  fn from(b: CreateChecklistBody) -> Self {
    NewChecklist {
      player_id:  b.player_id,
      match_id:   b.match_id,
      match_date: b.match_date,
      has_pain:   b.has_pain,
      pain_intensity: b.pain_intensity,
      pain_zone:  b.pain_zone,
      mechanism:  b.mechanism,
      phase_of_appearance: b.phase_of_appearance,
      presumptive_diagnosis: b.presumptive_diagnosis,
      immediate_treatment: b.immediate_treatment,
      observations: b.observations,
      recorded_by: b.recorded_by,
    }
  }
}

/// `POST /checklists` — returns 201 + the stored checklist. The pain-details
/// invariant is enforced in the service, so it holds regardless of which
/// client calls.
pub async fn create<S: ClinicalStore>(
  State(state): State<AppState<S>>,
  Json(body): Json<CreateChecklistBody>,
) -> Result<impl IntoResponse, ApiError> {
  let checklist = state
    .timeline
    .record_checklist(NewChecklist::from(body))
    .await?;
  Ok((StatusCode::CREATED, Json(checklist)))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /players/:id/checklists`
pub async fn list_for_player<S: ClinicalStore>(
  State(state): State<AppState<S>>,
  Path(player_id): Path<Uuid>,
) -> Result<Json<Vec<PostMatchChecklist>>, ApiError> {
  let checklists = state.timeline.checklists_for_player(player_id).await?;
  Ok(Json(checklists))
}
