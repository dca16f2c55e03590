//! Error types for `fisio-core`.

use chrono::{Duration, NaiveDate};
use thiserror::Error;
use uuid::Uuid;

use crate::status::DailyStatusEntry;

#[derive(Debug, Error)]
pub enum Error {
  #[error("player not found: {0}")]
  PlayerNotFound(Uuid),

  #[error("player {0} is deactivated")]
  PlayerInactive(Uuid),

  #[error("injury not found: {0}")]
  InjuryNotFound(Uuid),

  #[error("injury {0} is already finalized")]
  InjuryAlreadyFinalized(Uuid),

  #[error("cannot finalize injury {injury_id} on {end}: injury started {start}")]
  FinalizedBeforeStart {
    injury_id: Uuid,
    start:     NaiveDate,
    end:       NaiveDate,
  },

  /// A daily entry already exists for this injury and date. Carries the entry
  /// that won and how long until the next local calendar day begins, so the
  /// caller can tell the user exactly when to retry.
  #[error(
    "an entry for {date} already exists on injury {injury_id}; next entry allowed in {}h{:02}m",
    .retry_in.num_hours(),
    .retry_in.num_minutes() % 60
  )]
  DuplicateEntry {
    injury_id: Uuid,
    date:      NaiveDate,
    existing:  Box<DailyStatusEntry>,
    retry_in:  Duration,
  },

  #[error("pain intensity and body zone are required when the pain flag is set")]
  PainDetailsRequired,

  #[error("pain intensity and body zone are only allowed when the pain flag is set")]
  PainDetailsWithoutPain,

  #[error("pain intensity {0} is out of range (1-10)")]
  PainIntensityOutOfRange(u8),

  #[error("a checklist for player {player_id} and match {match_id} already exists")]
  ChecklistAlreadyRecorded { player_id: Uuid, match_id: Uuid },

  /// Transport or collaborator failure in the underlying store. Recoverable
  /// at the call site; nothing in this crate treats it as fatal.
  #[error("storage unavailable: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
