//! Handlers for the daily-status timeline endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/injuries/:id/status` | 409 + retry info if today's entry exists |
//! | `GET`  | `/injuries/:id/history` | Date-ascending, oldest first |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{Local, NaiveDate};
use fisio_core::{
  status::{DailyStatusEntry, NewDailyStatus, RecoveryState},
  store::ClinicalStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /injuries/:id/status`.
/// An omitted `fecha` means "today" in local wall-clock terms — the normal
/// case for the daily check-in screen.
#[derive(Debug, Deserialize)]
pub struct CreateStatusBody {
  #[serde(rename = "fecha")]
  pub date:        Option<NaiveDate>,
  #[serde(rename = "estado")]
  pub state:       RecoveryState,
  #[serde(rename = "observacion")]
  pub observation: Option<String>,
  #[serde(rename = "registrado_por")]
  pub recorded_by: String,
}

/// `POST /injuries/:id/status` — returns 201 + the stored entry.
///
/// A duplicate for the same (injury, date) returns 409 with the existing
/// entry and `retry_in_seconds` until the next local calendar day.
pub async fn create<S: ClinicalStore>(
  State(state): State<AppState<S>>,
  Path(injury_id): Path<Uuid>,
  Json(body): Json<CreateStatusBody>,
) -> Result<impl IntoResponse, ApiError> {
  let input = NewDailyStatus {
    injury_id,
    date: body.date.unwrap_or_else(|| Local::now().date_naive()),
    state: body.state,
    observation: body.observation,
    recorded_by: body.recorded_by,
  };
  let entry = state.timeline.record_daily_status(input).await?;
  Ok((StatusCode::CREATED, Json(entry)))
}

// ─── History ──────────────────────────────────────────────────────────────────

/// `GET /injuries/:id/history` — all entries, oldest first. The
/// visualization layer relies on this ordering to render left-to-right
/// chronologically.
pub async fn history<S: ClinicalStore>(
  State(state): State<AppState<S>>,
  Path(injury_id): Path<Uuid>,
) -> Result<Json<Vec<DailyStatusEntry>>, ApiError> {
  let entries = state.timeline.get_daily_history(injury_id).await?;
  Ok(Json(entries))
}
