//! Handlers for `/injuries` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/injuries` | Body: [`CreateInjuryBody`]; 422 for inactive player |
//! | `GET`  | `/injuries/active` | Active injuries with player context |
//! | `GET`  | `/injuries/:id` | 404 if not found |
//! | `POST` | `/injuries/:id/finalize` | Terminal; 422 if already finalized |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{Local, NaiveDate};
use fisio_core::{
  injury::{Injury, InjuryType, NewInjury, Severity},
  report::InjuryWithPlayer,
  store::ClinicalStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /injuries`.
#[derive(Debug, Deserialize)]
pub struct CreateInjuryBody {
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
  #[serde(rename = "fecha_lesion")]
  pub start_date:  NaiveDate,
}

impl From<CreateInjuryBody> for NewInjury {
  fn from(b: CreateInjuryBody) -> Self {
    NewInjury {
      player_id:   b.player_id,
      diagnosis:   b.diagnosis,
      injury_type: b.injury_type,
      body_region: b.body_region,
      severity:    b.severity,
      mechanism:   b.mechanism,
      estimated_recovery_days: b.estimated_recovery_days,
      start_date:  b.start_date,
    }
  }
}

/// `POST /injuries` — returns 201 + the stored [`Injury`].
pub async fn create<S: ClinicalStore>(
  State(state): State<AppState<S>>,
  Json(body): Json<CreateInjuryBody>,
) -> Result<impl IntoResponse, ApiError> {
  let injury = state.timeline.register_injury(NewInjury::from(body)).await?;
  Ok((StatusCode::CREATED, Json(injury)))
}

// ─── Reads ────────────────────────────────────────────────────────────────────

/// `GET /injuries/active` — active injuries joined with player context.
pub async fn list_active<S: ClinicalStore>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<InjuryWithPlayer>>, ApiError> {
  let injuries = state.timeline.list_active_injuries_with_context().await?;
  Ok(Json(injuries))
}

/// `GET /injuries/:id`
pub async fn get_one<S: ClinicalStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Injury>, ApiError> {
  let injury = state.timeline.get_injury(id).await?;
  Ok(Json(injury))
}

// ─── Finalize ─────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /injuries/:id/finalize`.
/// An omitted `fecha_fin` means "today" in local wall-clock terms.
#[derive(Debug, Default, Deserialize)]
pub struct FinalizeBody {
  #[serde(rename = "fecha_fin")]
  pub end_date: Option<NaiveDate>,
}

/// `POST /injuries/:id/finalize` — the one-way `ACTIVE → FINALIZED`
/// transition. Not idempotent: a second call returns 422.
pub async fn finalize<S: ClinicalStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  body: Option<Json<FinalizeBody>>,
) -> Result<Json<Injury>, ApiError> {
  let end_date = body
    .and_then(|Json(b)| b.end_date)
    .unwrap_or_else(|| Local::now().date_naive());
  let injury = state.timeline.finalize_injury(id, end_date).await?;
  Ok(Json(injury))
}
