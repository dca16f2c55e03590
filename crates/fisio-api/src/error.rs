//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every core error maps to a user-facing response; nothing here is fatal.
//! A duplicate daily entry is the expected-under-normal-use case and carries
//! enough payload for the UI to say exactly when the user may retry.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use fisio_core::status::DailyStatusEntry;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// A daily entry for this (injury, date) already exists.
  #[error("conflict: {message}")]
  Conflict {
    message:          String,
    existing:         Box<DailyStatusEntry>,
    retry_in_seconds: i64,
  },

  /// A domain rule rejected the write.
  #[error("validation failed: {0}")]
  Validation(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<fisio_core::Error> for ApiError {
  fn from(e: fisio_core::Error) -> Self {
    use fisio_core::Error as E;
    match e {
      E::PlayerNotFound(_) | E::InjuryNotFound(_) => {
        ApiError::NotFound(e.to_string())
      }
      E::DuplicateEntry { ref existing, retry_in, .. } => ApiError::Conflict {
        message:          e.to_string(),
        existing:         existing.clone(),
        retry_in_seconds: retry_in.num_seconds(),
      },
      E::PlayerInactive(_)
      | E::InjuryAlreadyFinalized(_)
      | E::FinalizedBeforeStart { .. }
      | E::PainDetailsRequired
      | E::PainDetailsWithoutPain
      | E::PainIntensityOutOfRange(_)
      | E::ChecklistAlreadyRecorded { .. } => {
        ApiError::Validation(e.to_string())
      }
      E::Storage(source) => ApiError::Store(source),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::NotFound(m) => {
        (StatusCode::NOT_FOUND, Json(json!({ "error": m }))).into_response()
      }
      ApiError::BadRequest(m) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": m }))).into_response()
      }
      ApiError::Conflict { message, existing, retry_in_seconds } => (
        StatusCode::CONFLICT,
        Json(json!({
          "error": message,
          "existing": existing,
          "retry_in_seconds": retry_in_seconds,
        })),
      )
        .into_response(),
      ApiError::Validation(m) => (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "error": m })),
      )
        .into_response(),
      ApiError::Store(e) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": e.to_string() })),
      )
        .into_response(),
    }
  }
}
