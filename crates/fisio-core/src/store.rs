//! The `ClinicalStore` trait and supporting types.
//!
//! The trait is implemented by storage backends (`fisio-store-sqlite` in
//! production, [`crate::memory::MemoryStore`] in tests). Higher layers
//! (`fisio-api`, the timeline service) depend on this abstraction, not on
//! any concrete backend.

use std::future::Future;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
  checklist::{NewChecklist, PostMatchChecklist},
  injury::{Injury, NewInjury},
  player::{NewPlayer, Player},
  status::{DailyStatusEntry, NewDailyStatus},
};

// ─── Error classification ────────────────────────────────────────────────────

/// Implemented by every backend error type so the service layer can
/// distinguish a storage-level unique-constraint violation (the backstop for
/// the one-entry-per-day and one-checklist-per-match rules) from a transport
/// failure.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn is_unique_violation(&self) -> bool;
}

// ─── Query types ─────────────────────────────────────────────────────────────

/// Which injury date column a range query filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjuryDateField {
  /// `fecha_lesion` — onset date.
  StartDate,
  /// `fecha_fin` — finalization date.
  EndDate,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a fisio storage backend.
///
/// Daily entries and checklists are append-only; injuries mutate only
/// through the finalize transition; players mutate only through deactivation
/// and photo assignment. Calendar dates cross this boundary as
/// [`NaiveDate`] in the deployment's local convention — never normalized
/// through UTC midnight.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (tokio with `axum`).
pub trait ClinicalStore: Send + Sync {
  type Error: StoreError;

  // ── Players ───────────────────────────────────────────────────────────

  /// Create and persist a new player, active by default.
  fn add_player(
    &self,
    input: NewPlayer,
  ) -> impl Future<Output = Result<Player, Self::Error>> + Send + '_;

  /// Retrieve a player by UUID. Returns `None` if not found.
  fn get_player(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Player>, Self::Error>> + Send + '_;

  /// List all players, optionally filtered by the `activo` flag.
  fn list_players(
    &self,
    active: Option<bool>,
  ) -> impl Future<Output = Result<Vec<Player>, Self::Error>> + Send + '_;

  /// Clear the `activo` flag. Players are never deleted.
  /// Returns `None` if the player does not exist.
  fn deactivate_player(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Player>, Self::Error>> + Send + '_;

  /// Replace the profile-photo path reference.
  /// Returns `None` if the player does not exist.
  fn set_player_photo(
    &self,
    id: Uuid,
    photo: String,
  ) -> impl Future<Output = Result<Option<Player>, Self::Error>> + Send + '_;

  // ── Injuries ──────────────────────────────────────────────────────────

  /// Create and persist a new injury in the `ACTIVE` state.
  fn add_injury(
    &self,
    input: NewInjury,
  ) -> impl Future<Output = Result<Injury, Self::Error>> + Send + '_;

  /// Retrieve an injury by UUID. Returns `None` if not found.
  fn get_injury(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Injury>, Self::Error>> + Send + '_;

  /// All injuries with the given `esta_activa` flag.
  fn find_injuries_by_active_flag(
    &self,
    active: bool,
  ) -> impl Future<Output = Result<Vec<Injury>, Self::Error>> + Send + '_;

  /// Apply the finalize patch: clear the active flag, stamp the end date,
  /// store the computed actual recovery days. Precondition checks belong to
  /// the service layer; this is the raw update. Returns `None` if the
  /// injury does not exist.
  fn finalize_injury(
    &self,
    id: Uuid,
    end_date: NaiveDate,
    actual_recovery_days: i64,
  ) -> impl Future<Output = Result<Option<Injury>, Self::Error>> + Send + '_;

  /// Injuries whose selected date column falls within the inclusive
  /// `[start, end]` window. For [`InjuryDateField::EndDate`], injuries with
  /// no end date are excluded.
  fn find_injuries_by_date_range(
    &self,
    field: InjuryDateField,
    start: NaiveDate,
    end: NaiveDate,
  ) -> impl Future<Output = Result<Vec<Injury>, Self::Error>> + Send + '_;

  // ── Daily entries — append-only writes ────────────────────────────────

  /// Persist a new daily entry. Must fail with a unique-violation error if
  /// an entry for `(injury_id, date)` already exists, so the check/insert
  /// race is closed at the storage layer.
  fn insert_daily_entry(
    &self,
    input: NewDailyStatus,
  ) -> impl Future<Output = Result<DailyStatusEntry, Self::Error>> + Send + '_;

  /// All entries for an injury, ordered ascending by date.
  fn find_daily_entries_by_injury(
    &self,
    injury_id: Uuid,
  ) -> impl Future<Output = Result<Vec<DailyStatusEntry>, Self::Error>> + Send + '_;

  /// All entries whose date falls within the inclusive `[start, end]`
  /// window, across all injuries.
  fn find_daily_entries_by_date_range(
    &self,
    start: NaiveDate,
    end: NaiveDate,
  ) -> impl Future<Output = Result<Vec<DailyStatusEntry>, Self::Error>> + Send + '_;

  // ── Checklists ────────────────────────────────────────────────────────

  /// Persist a new checklist. Must fail with a unique-violation error if a
  /// checklist for `(player_id, match_id)` already exists.
  fn add_checklist(
    &self,
    input: NewChecklist,
  ) -> impl Future<Output = Result<PostMatchChecklist, Self::Error>> + Send + '_;

  /// All checklists recorded for a player.
  fn list_checklists_for_player(
    &self,
    player_id: Uuid,
  ) -> impl Future<Output = Result<Vec<PostMatchChecklist>, Self::Error>> + Send + '_;
}
