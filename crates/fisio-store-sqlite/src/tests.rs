//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use fisio_core::{
  checklist::NewChecklist,
  injury::{InjuryType, NewInjury, Severity},
  player::{NewPlayer, Player},
  status::{NewDailyStatus, RecoveryState},
  store::{ClinicalStore, InjuryDateField, StoreError as _},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn d(s: &str) -> NaiveDate {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn new_player(name: &str) -> NewPlayer {
  NewPlayer {
    name:       name.into(),
    rut:        "11.111.111-1".into(),
    birth_date: d("2000-01-15"),
    division:   "primera".into(),
    photo:      None,
  }
}

fn new_injury(player_id: Uuid, start: &str) -> NewInjury {
  NewInjury {
    player_id,
    diagnosis: "contractura gemelo".into(),
    injury_type: InjuryType::Muscular,
    body_region: "pantorrilla".into(),
    severity: Severity::Leve,
    mechanism: "sobrecarga".into(),
    estimated_recovery_days: 7,
    start_date: d(start),
  }
}

async fn seed(s: &SqliteStore) -> (Player, fisio_core::injury::Injury) {
  let player = s.add_player(new_player("Ana Díaz")).await.unwrap();
  let injury = s
    .add_injury(new_injury(player.player_id, "2024-06-01"))
    .await
    .unwrap();
  (player, injury)
}

// ─── Players ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_player() {
  let s = store().await;

  let player = s.add_player(new_player("Ana Díaz")).await.unwrap();
  assert!(player.active);

  let fetched = s.get_player(player.player_id).await.unwrap().unwrap();
  assert_eq!(fetched.player_id, player.player_id);
  assert_eq!(fetched.name, "Ana Díaz");
  assert_eq!(fetched.birth_date, d("2000-01-15"));
}

#[tokio::test]
async fn get_player_missing_returns_none() {
  let s = store().await;
  assert!(s.get_player(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn deactivate_keeps_the_row() {
  let s = store().await;
  let player = s.add_player(new_player("Ana Díaz")).await.unwrap();

  let updated = s
    .deactivate_player(player.player_id)
    .await
    .unwrap()
    .unwrap();
  assert!(!updated.active);

  // Still retrievable; never deleted.
  assert!(s.get_player(player.player_id).await.unwrap().is_some());

  let active_only = s.list_players(Some(true)).await.unwrap();
  assert!(active_only.is_empty());
  let all = s.list_players(None).await.unwrap();
  assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn set_photo_roundtrip() {
  let s = store().await;
  let player = s.add_player(new_player("Ana Díaz")).await.unwrap();

  let updated = s
    .set_player_photo(player.player_id, "fotos/ana.jpg".into())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(updated.photo.as_deref(), Some("fotos/ana.jpg"));
}

// ─── Injuries ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn new_injury_is_active_with_no_end_date() {
  let s = store().await;
  let (_, injury) = seed(&s).await;

  let fetched = s.get_injury(injury.injury_id).await.unwrap().unwrap();
  assert!(fetched.active);
  assert!(fetched.end_date.is_none());
  assert!(fetched.actual_recovery_days.is_none());
  assert_eq!(fetched.severity, Severity::Leve);
}

#[tokio::test]
async fn finalize_patch_is_applied() {
  let s = store().await;
  let (_, injury) = seed(&s).await;

  let updated = s
    .finalize_injury(injury.injury_id, d("2024-06-07"), 7)
    .await
    .unwrap()
    .unwrap();
  assert!(!updated.active);
  assert_eq!(updated.end_date, Some(d("2024-06-07")));
  assert_eq!(updated.actual_recovery_days, Some(7));

  let active = s.find_injuries_by_active_flag(true).await.unwrap();
  assert!(active.is_empty());
  let closed = s.find_injuries_by_active_flag(false).await.unwrap();
  assert_eq!(closed.len(), 1);
}

#[tokio::test]
async fn finalize_missing_injury_returns_none() {
  let s = store().await;
  let result = s
    .finalize_injury(Uuid::new_v4(), d("2024-06-07"), 7)
    .await
    .unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn date_range_queries_are_inclusive_and_field_scoped() {
  let s = store().await;
  let player = s.add_player(new_player("Ana Díaz")).await.unwrap();

  let june = s
    .add_injury(new_injury(player.player_id, "2024-06-01"))
    .await
    .unwrap();
  let may = s
    .add_injury(new_injury(player.player_id, "2024-05-20"))
    .await
    .unwrap();
  s.finalize_injury(may.injury_id, d("2024-06-30"), 42)
    .await
    .unwrap();

  let started = s
    .find_injuries_by_date_range(
      InjuryDateField::StartDate,
      d("2024-06-01"),
      d("2024-06-30"),
    )
    .await
    .unwrap();
  assert_eq!(started.len(), 1);
  assert_eq!(started[0].injury_id, june.injury_id);

  let finalized = s
    .find_injuries_by_date_range(
      InjuryDateField::EndDate,
      d("2024-06-01"),
      d("2024-06-30"),
    )
    .await
    .unwrap();
  assert_eq!(finalized.len(), 1);
  assert_eq!(finalized[0].injury_id, may.injury_id);
}

// ─── Daily entries ───────────────────────────────────────────────────────────

#[tokio::test]
async fn entry_roundtrip() {
  let s = store().await;
  let (_, injury) = seed(&s).await;

  let mut input = NewDailyStatus::new(
    injury.injury_id,
    d("2024-06-02"),
    RecoveryState::Camilla,
    "klgo. pérez",
  );
  input.observation = Some("dolor a la palpación".into());

  let entry = s.insert_daily_entry(input).await.unwrap();

  let entries = s
    .find_daily_entries_by_injury(injury.injury_id)
    .await
    .unwrap();
  assert_eq!(entries.len(), 1);
  assert_eq!(entries[0].entry_id, entry.entry_id);
  assert_eq!(entries[0].state, RecoveryState::Camilla);
  assert_eq!(
    entries[0].observation.as_deref(),
    Some("dolor a la palpación")
  );
  assert_eq!(entries[0].recorded_by, "klgo. pérez");
}

#[tokio::test]
async fn unique_index_rejects_same_day_entry() {
  let s = store().await;
  let (_, injury) = seed(&s).await;

  s.insert_daily_entry(NewDailyStatus::new(
    injury.injury_id,
    d("2024-06-02"),
    RecoveryState::Camilla,
    "klgo. pérez",
  ))
  .await
  .unwrap();

  let err = s
    .insert_daily_entry(NewDailyStatus::new(
      injury.injury_id,
      d("2024-06-02"),
      RecoveryState::Gimnasio,
      "klgo. pérez",
    ))
    .await
    .unwrap_err();
  assert!(err.is_unique_violation());

  // The existing entry was never mutated.
  let entries = s
    .find_daily_entries_by_injury(injury.injury_id)
    .await
    .unwrap();
  assert_eq!(entries.len(), 1);
  assert_eq!(entries[0].state, RecoveryState::Camilla);
}

#[tokio::test]
async fn same_day_on_different_injuries_is_allowed() {
  let s = store().await;
  let player = s.add_player(new_player("Ana Díaz")).await.unwrap();
  let a = s
    .add_injury(new_injury(player.player_id, "2024-06-01"))
    .await
    .unwrap();
  let b = s
    .add_injury(new_injury(player.player_id, "2024-06-01"))
    .await
    .unwrap();

  for injury_id in [a.injury_id, b.injury_id] {
    s.insert_daily_entry(NewDailyStatus::new(
      injury_id,
      d("2024-06-02"),
      RecoveryState::Camilla,
      "klgo. pérez",
    ))
    .await
    .unwrap();
  }
}

#[tokio::test]
async fn entries_come_back_date_ascending() {
  let s = store().await;
  let (_, injury) = seed(&s).await;

  for date in ["2024-06-05", "2024-06-02", "2024-06-04"] {
    s.insert_daily_entry(NewDailyStatus::new(
      injury.injury_id,
      d(date),
      RecoveryState::Gimnasio,
      "klgo. pérez",
    ))
    .await
    .unwrap();
  }

  let entries = s
    .find_daily_entries_by_injury(injury.injury_id)
    .await
    .unwrap();
  let dates: Vec<_> = entries.iter().map(|e| e.date.to_string()).collect();
  assert_eq!(dates, ["2024-06-02", "2024-06-04", "2024-06-05"]);
}

#[tokio::test]
async fn entry_date_range_is_inclusive() {
  let s = store().await;
  let (_, injury) = seed(&s).await;

  for date in ["2024-05-31", "2024-06-01", "2024-06-30", "2024-07-01"] {
    s.insert_daily_entry(NewDailyStatus::new(
      injury.injury_id,
      d(date),
      RecoveryState::Camilla,
      "klgo. pérez",
    ))
    .await
    .unwrap();
  }

  let june = s
    .find_daily_entries_by_date_range(d("2024-06-01"), d("2024-06-30"))
    .await
    .unwrap();
  assert_eq!(june.len(), 2);
}

// ─── Checklists ──────────────────────────────────────────────────────────────

fn new_checklist(player_id: Uuid, match_id: Uuid) -> NewChecklist {
  NewChecklist {
    player_id,
    match_id,
    match_date: d("2024-06-15"),
    has_pain: true,
    pain_intensity: Some(4),
    pain_zone: Some("aductor".into()),
    mechanism: Some("cambio de dirección".into()),
    phase_of_appearance: Some("segundo tiempo".into()),
    presumptive_diagnosis: None,
    immediate_treatment: Some("crioterapia".into()),
    observations: None,
    recorded_by: "dr. soto".into(),
  }
}

#[tokio::test]
async fn checklist_roundtrip() {
  let s = store().await;
  let player = s.add_player(new_player("Ana Díaz")).await.unwrap();
  let match_id = Uuid::new_v4();

  let stored = s
    .add_checklist(new_checklist(player.player_id, match_id))
    .await
    .unwrap();
  assert_eq!(stored.match_id, match_id);

  let list = s
    .list_checklists_for_player(player.player_id)
    .await
    .unwrap();
  assert_eq!(list.len(), 1);
  assert_eq!(list[0].pain_intensity, Some(4));
  assert_eq!(list[0].pain_zone.as_deref(), Some("aductor"));
}

#[tokio::test]
async fn second_checklist_for_same_match_is_rejected() {
  let s = store().await;
  let player = s.add_player(new_player("Ana Díaz")).await.unwrap();
  let match_id = Uuid::new_v4();

  s.add_checklist(new_checklist(player.player_id, match_id))
    .await
    .unwrap();
  let err = s
    .add_checklist(new_checklist(player.player_id, match_id))
    .await
    .unwrap_err();
  assert!(err.is_unique_violation());
}
