//! The injury timeline service — the one component with real state-machine
//! structure.
//!
//! Owns the create/query logic for daily status entries, the terminal
//! finalize transition for injuries, and period aggregation for informe
//! generation. Storage-agnostic: works against any [`ClinicalStore`].

use std::{collections::HashMap, sync::Arc};

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};
use uuid::Uuid;

use crate::{
  Error, Result,
  checklist::{NewChecklist, PostMatchChecklist},
  injury::{Injury, NewInjury, inclusive_recovery_days},
  period::ReportPeriod,
  player::Player,
  report::{
    EntryWithContext, InjuryWithPlayer, PeriodReport, PlayerDisplay,
    ReportSummary,
  },
  status::{DailyStatusEntry, NewDailyStatus},
  store::{ClinicalStore, InjuryDateField, StoreError},
};

// ─── Duplicate-wait math ─────────────────────────────────────────────────────

/// Time remaining until the local calendar day after `date` begins.
///
/// Clamped at zero: a duplicate for a past date reports "retry now" rather
/// than a negative duration.
fn wait_until_next_day(date: NaiveDate, now: NaiveDateTime) -> Duration {
  match date.succ_opt() {
    Some(next) => {
      let midnight = next.and_time(NaiveTime::MIN);
      midnight.signed_duration_since(now).max(Duration::zero())
    }
    None => Duration::zero(),
  }
}

// ─── Service ─────────────────────────────────────────────────────────────────

/// The timeline service over an injected store.
///
/// Cloning is cheap — the store is reference-counted.
pub struct TimelineService<S> {
  store: Arc<S>,
}

impl<S> Clone for TimelineService<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store) }
  }
}

impl<S: ClinicalStore> TimelineService<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self { store }
  }

  fn storage(e: S::Error) -> Error {
    Error::Storage(Box::new(e))
  }

  fn duplicate(existing: DailyStatusEntry) -> Error {
    let retry_in =
      wait_until_next_day(existing.date, Local::now().naive_local());
    Error::DuplicateEntry {
      injury_id: existing.injury_id,
      date: existing.date,
      existing: Box::new(existing),
      retry_in,
    }
  }

  // ── Daily entries ─────────────────────────────────────────────────────

  /// Record one recovery-state observation for one injury on one day.
  ///
  /// Rejects a second entry for the same (injury, date) with
  /// [`Error::DuplicateEntry`]; the existing entry is never mutated.
  /// Rejects writes against missing or finalized injuries.
  pub async fn record_daily_status(
    &self,
    input: NewDailyStatus,
  ) -> Result<DailyStatusEntry> {
    let injury = self
      .store
      .get_injury(input.injury_id)
      .await
      .map_err(Self::storage)?
      .ok_or(Error::InjuryNotFound(input.injury_id))?;

    if !injury.active {
      return Err(Error::InjuryAlreadyFinalized(injury.injury_id));
    }

    let existing = self
      .store
      .find_daily_entries_by_injury(input.injury_id)
      .await
      .map_err(Self::storage)?;
    if let Some(dup) = existing.into_iter().find(|e| e.date == input.date) {
      return Err(Self::duplicate(dup));
    }

    let injury_id = input.injury_id;
    let date = input.date;
    match self.store.insert_daily_entry(input).await {
      Ok(entry) => Ok(entry),
      Err(e) if e.is_unique_violation() => {
        // Lost the check-then-insert race; surface the entry that won.
        let entries = self
          .store
          .find_daily_entries_by_injury(injury_id)
          .await
          .map_err(Self::storage)?;
        match entries.into_iter().find(|e2| e2.date == date) {
          Some(dup) => Err(Self::duplicate(dup)),
          None => Err(Self::storage(e)),
        }
      }
      Err(e) => Err(Self::storage(e)),
    }
  }

  /// All entries for the injury, ordered ascending by date. The ordering is
  /// a contract: the visualization layer renders left-to-right
  /// chronologically and reads min/max labels from the first and last
  /// elements.
  pub async fn get_daily_history(
    &self,
    injury_id: Uuid,
  ) -> Result<Vec<DailyStatusEntry>> {
    self
      .store
      .get_injury(injury_id)
      .await
      .map_err(Self::storage)?
      .ok_or(Error::InjuryNotFound(injury_id))?;

    let mut entries = self
      .store
      .find_daily_entries_by_injury(injury_id)
      .await
      .map_err(Self::storage)?;
    // Enforced here regardless of what the backend returns.
    entries.sort_by_key(|e| e.date);
    Ok(entries)
  }

  // ── Injuries ──────────────────────────────────────────────────────────

  /// Register a new injury for an active player.
  pub async fn register_injury(&self, input: NewInjury) -> Result<Injury> {
    let player = self
      .store
      .get_player(input.player_id)
      .await
      .map_err(Self::storage)?
      .ok_or(Error::PlayerNotFound(input.player_id))?;
    if !player.active {
      return Err(Error::PlayerInactive(player.player_id));
    }
    self.store.add_injury(input).await.map_err(Self::storage)
  }

  pub async fn get_injury(&self, injury_id: Uuid) -> Result<Injury> {
    self
      .store
      .get_injury(injury_id)
      .await
      .map_err(Self::storage)?
      .ok_or(Error::InjuryNotFound(injury_id))
  }

  /// The one-way terminal transition: `ACTIVE → FINALIZED`.
  ///
  /// Not idempotent — finalization is a point-in-time clinical decision, so
  /// a second call fails with [`Error::InjuryAlreadyFinalized`] rather than
  /// silently succeeding.
  pub async fn finalize_injury(
    &self,
    injury_id: Uuid,
    finalized_on: NaiveDate,
  ) -> Result<Injury> {
    let injury = self
      .store
      .get_injury(injury_id)
      .await
      .map_err(Self::storage)?
      .ok_or(Error::InjuryNotFound(injury_id))?;

    if !injury.active {
      return Err(Error::InjuryAlreadyFinalized(injury_id));
    }
    if finalized_on < injury.start_date {
      return Err(Error::FinalizedBeforeStart {
        injury_id,
        start: injury.start_date,
        end: finalized_on,
      });
    }

    let actual = inclusive_recovery_days(injury.start_date, finalized_on);
    self
      .store
      .finalize_injury(injury_id, finalized_on, actual)
      .await
      .map_err(Self::storage)?
      .ok_or(Error::InjuryNotFound(injury_id))
  }

  /// All active injuries joined with their owning player's display
  /// attributes, for list rendering.
  pub async fn list_active_injuries_with_context(
    &self,
  ) -> Result<Vec<InjuryWithPlayer>> {
    let injuries = self
      .store
      .find_injuries_by_active_flag(true)
      .await
      .map_err(Self::storage)?;

    let mut players: HashMap<Uuid, Player> = HashMap::new();
    let mut out = Vec::with_capacity(injuries.len());
    for injury in injuries {
      let display = self.player_display(&mut players, injury.player_id).await?;
      out.push(InjuryWithPlayer { injury, player: display });
    }
    Ok(out)
  }

  // ── Reports ───────────────────────────────────────────────────────────

  /// Aggregate over the inclusive `[start, end]` window.
  ///
  /// The three buckets are independent and may overlap: a short injury that
  /// starts and ends inside the window appears in both `nuevas_lesiones`
  /// and `lesiones_finalizadas`. No cross-bucket dedup, no imposed
  /// ordering.
  pub async fn aggregate_for_period(
    &self,
    start: NaiveDate,
    end: NaiveDate,
  ) -> Result<PeriodReport> {
    let started = self
      .store
      .find_injuries_by_date_range(InjuryDateField::StartDate, start, end)
      .await
      .map_err(Self::storage)?;
    let finalized = self
      .store
      .find_injuries_by_date_range(InjuryDateField::EndDate, start, end)
      .await
      .map_err(Self::storage)?;
    let entries = self
      .store
      .find_daily_entries_by_date_range(start, end)
      .await
      .map_err(Self::storage)?;

    let mut players: HashMap<Uuid, Player> = HashMap::new();
    let mut injuries: HashMap<Uuid, Injury> = HashMap::new();
    for injury in started.iter().chain(finalized.iter()) {
      injuries.insert(injury.injury_id, injury.clone());
    }

    let mut new_injuries = Vec::with_capacity(started.len());
    for injury in started {
      let player = self.player_display(&mut players, injury.player_id).await?;
      new_injuries.push(InjuryWithPlayer { injury, player });
    }

    let mut finalized_injuries = Vec::with_capacity(finalized.len());
    for injury in finalized {
      let player = self.player_display(&mut players, injury.player_id).await?;
      finalized_injuries.push(InjuryWithPlayer { injury, player });
    }

    let mut daily_changes = Vec::with_capacity(entries.len());
    for entry in entries {
      let injury = match injuries.get(&entry.injury_id) {
        Some(i) => i.clone(),
        None => {
          let i = self
            .store
            .get_injury(entry.injury_id)
            .await
            .map_err(Self::storage)?
            .ok_or(Error::InjuryNotFound(entry.injury_id))?;
          injuries.insert(i.injury_id, i.clone());
          i
        }
      };
      let player = self.player_display(&mut players, injury.player_id).await?;
      daily_changes.push(EntryWithContext {
        entry,
        diagnosis: injury.diagnosis,
        player,
      });
    }

    let summary = ReportSummary {
      new_injuries:       new_injuries.len(),
      finalized_injuries: finalized_injuries.len(),
      daily_changes:      daily_changes.len(),
    };

    Ok(PeriodReport {
      period: ReportPeriod { start, end },
      new_injuries,
      finalized_injuries,
      daily_changes,
      summary,
    })
  }

  // ── Checklists ────────────────────────────────────────────────────────

  /// Record a post-match checklist. The pain-details invariant and the
  /// one-per-(player, match) rule are enforced here, not in any client.
  pub async fn record_checklist(
    &self,
    input: NewChecklist,
  ) -> Result<PostMatchChecklist> {
    input.validate()?;

    self
      .store
      .get_player(input.player_id)
      .await
      .map_err(Self::storage)?
      .ok_or(Error::PlayerNotFound(input.player_id))?;

    let player_id = input.player_id;
    let match_id = input.match_id;
    match self.store.add_checklist(input).await {
      Ok(checklist) => Ok(checklist),
      Err(e) if e.is_unique_violation() => {
        Err(Error::ChecklistAlreadyRecorded { player_id, match_id })
      }
      Err(e) => Err(Self::storage(e)),
    }
  }

  pub async fn checklists_for_player(
    &self,
    player_id: Uuid,
  ) -> Result<Vec<PostMatchChecklist>> {
    self
      .store
      .get_player(player_id)
      .await
      .map_err(Self::storage)?
      .ok_or(Error::PlayerNotFound(player_id))?;
    self
      .store
      .list_checklists_for_player(player_id)
      .await
      .map_err(Self::storage)
  }

  // ── Internal ──────────────────────────────────────────────────────────

  async fn player_display(
    &self,
    cache: &mut HashMap<Uuid, Player>,
    player_id: Uuid,
  ) -> Result<PlayerDisplay> {
    if let Some(p) = cache.get(&player_id) {
      return Ok(PlayerDisplay::from(p));
    }
    let player = self
      .store
      .get_player(player_id)
      .await
      .map_err(Self::storage)?
      .ok_or(Error::PlayerNotFound(player_id))?;
    let display = PlayerDisplay::from(&player);
    cache.insert(player_id, player);
    Ok(display)
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use chrono::{Duration, NaiveDate};
  use uuid::Uuid;

  use super::{TimelineService, wait_until_next_day};
  use crate::{
    Error,
    injury::{Injury, InjuryType, NewInjury, Severity},
    memory::MemoryStore,
    player::{NewPlayer, Player},
    status::{NewDailyStatus, RecoveryState},
    store::ClinicalStore,
  };

  fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
  }

  fn service() -> (TimelineService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (TimelineService::new(store.clone()), store)
  }

  async fn seed_player(store: &MemoryStore) -> Player {
    store
      .add_player(NewPlayer {
        name:       "Matías Rojas".into(),
        rut:        "12.345.678-9".into(),
        birth_date: d("2001-03-22"),
        division:   "primera".into(),
        photo:      None,
      })
      .await
      .unwrap()
  }

  async fn seed_injury(
    store: &MemoryStore,
    player_id: Uuid,
    start: &str,
  ) -> Injury {
    store
      .add_injury(NewInjury {
        player_id,
        diagnosis: "desgarro isquiotibial".into(),
        injury_type: InjuryType::Muscular,
        body_region: "muslo posterior".into(),
        severity: Severity::Moderada,
        mechanism: "sprint".into(),
        estimated_recovery_days: 21,
        start_date: d(start),
      })
      .await
      .unwrap()
  }

  // ── Duplicate-wait math ───────────────────────────────────────────────

  #[test]
  fn wait_at_2200_is_two_hours() {
    let now = d("2024-06-15").and_hms_opt(22, 0, 0).unwrap();
    assert_eq!(wait_until_next_day(d("2024-06-15"), now), Duration::hours(2));
  }

  #[test]
  fn wait_for_past_date_clamps_to_zero() {
    let now = d("2024-06-15").and_hms_opt(10, 0, 0).unwrap();
    assert_eq!(wait_until_next_day(d("2024-06-10"), now), Duration::zero());
  }

  // ── At-most-one-per-day ───────────────────────────────────────────────

  #[tokio::test]
  async fn second_entry_same_day_is_rejected_and_never_mutates() {
    let (svc, store) = service();
    let player = seed_player(&store).await;
    let injury = seed_injury(&store, player.player_id, "2024-06-01").await;

    let first = svc
      .record_daily_status(NewDailyStatus::new(
        injury.injury_id,
        d("2024-06-02"),
        RecoveryState::Camilla,
        "klgo. pérez",
      ))
      .await
      .unwrap();

    let err = svc
      .record_daily_status(NewDailyStatus::new(
        injury.injury_id,
        d("2024-06-02"),
        RecoveryState::Gimnasio,
        "klgo. pérez",
      ))
      .await
      .unwrap_err();

    match err {
      Error::DuplicateEntry { existing, .. } => {
        assert_eq!(existing.entry_id, first.entry_id);
        assert_eq!(existing.state, RecoveryState::Camilla);
      }
      other => panic!("expected DuplicateEntry, got {other:?}"),
    }

    let history = svc.get_daily_history(injury.injury_id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].state, RecoveryState::Camilla);
  }

  #[tokio::test]
  async fn entries_on_distinct_days_are_accepted() {
    let (svc, store) = service();
    let player = seed_player(&store).await;
    let injury = seed_injury(&store, player.player_id, "2024-06-01").await;

    for (date, state) in [
      ("2024-06-02", RecoveryState::Camilla),
      ("2024-06-03", RecoveryState::Gimnasio),
      ("2024-06-04", RecoveryState::Reintegro),
    ] {
      svc
        .record_daily_status(NewDailyStatus::new(
          injury.injury_id,
          d(date),
          state,
          "klgo. pérez",
        ))
        .await
        .unwrap();
    }

    let history = svc.get_daily_history(injury.injury_id).await.unwrap();
    assert_eq!(history.len(), 3);
  }

  #[tokio::test]
  async fn recording_against_unknown_injury_fails() {
    let (svc, _store) = service();
    let err = svc
      .record_daily_status(NewDailyStatus::new(
        Uuid::new_v4(),
        d("2024-06-02"),
        RecoveryState::Camilla,
        "klgo. pérez",
      ))
      .await
      .unwrap_err();
    assert!(matches!(err, Error::InjuryNotFound(_)));
  }

  // ── Finalize is terminal ──────────────────────────────────────────────

  #[tokio::test]
  async fn finalize_sets_end_date_and_inclusive_day_count() {
    let (svc, store) = service();
    let player = seed_player(&store).await;
    let injury = seed_injury(&store, player.player_id, "2024-06-01").await;

    let finalized = svc
      .finalize_injury(injury.injury_id, d("2024-06-21"))
      .await
      .unwrap();

    assert!(!finalized.active);
    assert_eq!(finalized.end_date, Some(d("2024-06-21")));
    assert_eq!(finalized.actual_recovery_days, Some(21));
  }

  #[tokio::test]
  async fn finalize_twice_fails() {
    let (svc, store) = service();
    let player = seed_player(&store).await;
    let injury = seed_injury(&store, player.player_id, "2024-06-01").await;

    svc
      .finalize_injury(injury.injury_id, d("2024-06-10"))
      .await
      .unwrap();
    let err = svc
      .finalize_injury(injury.injury_id, d("2024-06-11"))
      .await
      .unwrap_err();
    assert!(matches!(err, Error::InjuryAlreadyFinalized(_)));
  }

  #[tokio::test]
  async fn no_entries_after_finalize() {
    let (svc, store) = service();
    let player = seed_player(&store).await;
    let injury = seed_injury(&store, player.player_id, "2024-06-01").await;

    svc
      .finalize_injury(injury.injury_id, d("2024-06-10"))
      .await
      .unwrap();

    let err = svc
      .record_daily_status(NewDailyStatus::new(
        injury.injury_id,
        d("2024-06-11"),
        RecoveryState::Reintegro,
        "klgo. pérez",
      ))
      .await
      .unwrap_err();
    assert!(matches!(err, Error::InjuryAlreadyFinalized(_)));
  }

  #[tokio::test]
  async fn finalize_before_start_is_rejected() {
    let (svc, store) = service();
    let player = seed_player(&store).await;
    let injury = seed_injury(&store, player.player_id, "2024-06-10").await;

    let err = svc
      .finalize_injury(injury.injury_id, d("2024-06-05"))
      .await
      .unwrap_err();
    assert!(matches!(err, Error::FinalizedBeforeStart { .. }));
  }

  // ── History ordering ──────────────────────────────────────────────────

  #[tokio::test]
  async fn history_is_date_ascending_regardless_of_insertion_order() {
    let (svc, store) = service();
    let player = seed_player(&store).await;
    let injury = seed_injury(&store, player.player_id, "2024-06-01").await;

    for date in ["2024-06-05", "2024-06-02", "2024-06-04", "2024-06-03"] {
      svc
        .record_daily_status(NewDailyStatus::new(
          injury.injury_id,
          d(date),
          RecoveryState::Camilla,
          "klgo. pérez",
        ))
        .await
        .unwrap();
    }

    let history = svc.get_daily_history(injury.injury_id).await.unwrap();
    let dates: Vec<_> = history.iter().map(|e| e.date.to_string()).collect();
    assert_eq!(
      dates,
      ["2024-06-02", "2024-06-03", "2024-06-04", "2024-06-05"]
    );
  }

  // ── Aggregation ───────────────────────────────────────────────────────

  #[tokio::test]
  async fn short_injury_lands_in_both_buckets() {
    let (svc, store) = service();
    let player = seed_player(&store).await;
    let injury = seed_injury(&store, player.player_id, "2024-06-01").await;
    svc
      .finalize_injury(injury.injury_id, d("2024-06-03"))
      .await
      .unwrap();

    let report = svc
      .aggregate_for_period(d("2024-06-01"), d("2024-06-03"))
      .await
      .unwrap();

    assert_eq!(report.summary.new_injuries, 1);
    assert_eq!(report.summary.finalized_injuries, 1);
    assert_eq!(
      report.new_injuries[0].injury.injury_id,
      report.finalized_injuries[0].injury.injury_id
    );
  }

  #[tokio::test]
  async fn aggregation_windows_entries_and_annotates_context() {
    let (svc, store) = service();
    let player = seed_player(&store).await;
    let injury = seed_injury(&store, player.player_id, "2024-05-20").await;

    for date in ["2024-05-30", "2024-06-02", "2024-06-15", "2024-07-01"] {
      svc
        .record_daily_status(NewDailyStatus::new(
          injury.injury_id,
          d(date),
          RecoveryState::Gimnasio,
          "klgo. pérez",
        ))
        .await
        .unwrap();
    }

    let report = svc
      .aggregate_for_period(d("2024-06-01"), d("2024-06-30"))
      .await
      .unwrap();

    // Injury started in May: not a new injury for June.
    assert_eq!(report.summary.new_injuries, 0);
    assert_eq!(report.summary.daily_changes, 2);
    for change in &report.daily_changes {
      assert_eq!(change.diagnosis, "desgarro isquiotibial");
      assert_eq!(change.player.name, "Matías Rojas");
    }
  }

  // ── Player preconditions ──────────────────────────────────────────────

  #[tokio::test]
  async fn injury_for_deactivated_player_is_rejected() {
    let (svc, store) = service();
    let player = seed_player(&store).await;
    store.deactivate_player(player.player_id).await.unwrap();

    let err = svc
      .register_injury(NewInjury {
        player_id: player.player_id,
        diagnosis: "esguince".into(),
        injury_type: InjuryType::Ligamentosa,
        body_region: "tobillo".into(),
        severity: Severity::Leve,
        mechanism: "apoyo".into(),
        estimated_recovery_days: 10,
        start_date: d("2024-06-01"),
      })
      .await
      .unwrap_err();
    assert!(matches!(err, Error::PlayerInactive(_)));
  }
}
