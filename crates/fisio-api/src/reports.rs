//! Handlers for informe generation.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/reports` | `?kind=diario\|semanal\|mensual\|anual[&date=...]` |
//! | `GET`  | `/reports/range` | `?start=YYYY-MM-DD&end=YYYY-MM-DD` |

use axum::{
  Json,
  extract::{Query, State},
};
use chrono::{Local, NaiveDate};
use fisio_core::{
  period::{ReportKind, ReportPeriod},
  report::PeriodReport,
  store::ClinicalStore,
};
use serde::Deserialize;

use crate::{AppState, error::ApiError};

// ─── By kind ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct KindParams {
  pub kind: ReportKind,
  /// Reference date the period is computed around; defaults to today
  /// (local wall clock).
  pub date: Option<NaiveDate>,
}

/// `GET /reports?kind=<kind>[&date=YYYY-MM-DD]`
pub async fn for_kind<S: ClinicalStore>(
  State(state): State<AppState<S>>,
  Query(params): Query<KindParams>,
) -> Result<Json<PeriodReport>, ApiError> {
  let reference = params.date.unwrap_or_else(|| Local::now().date_naive());
  let period = ReportPeriod::containing(params.kind, reference);
  let report = state
    .timeline
    .aggregate_for_period(period.start, period.end)
    .await?;
  Ok(Json(report))
}

// ─── Explicit range ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RangeParams {
  pub start: NaiveDate,
  pub end:   NaiveDate,
}

/// `GET /reports/range?start=YYYY-MM-DD&end=YYYY-MM-DD` — inclusive window.
pub async fn for_range<S: ClinicalStore>(
  State(state): State<AppState<S>>,
  Query(params): Query<RangeParams>,
) -> Result<Json<PeriodReport>, ApiError> {
  if params.end < params.start {
    return Err(ApiError::BadRequest(format!(
      "end {} precedes start {}",
      params.end, params.start
    )));
  }
  let report = state
    .timeline
    .aggregate_for_period(params.start, params.end)
    .await?;
  Ok(Json(report))
}
