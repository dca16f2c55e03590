//! Error type for `fisio-store-sqlite`.

use fisio_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// An INSERT hit one of the schema's UNIQUE indexes. The service layer
  /// translates this back into the matching domain error.
  #[error("unique constraint violated on {0}")]
  UniqueViolation(&'static str),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown enum value: {0:?}")]
  UnknownValue(String),
}

impl StoreError for Error {
  fn is_unique_violation(&self) -> bool {
    matches!(self, Self::UniqueViolation(_))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
