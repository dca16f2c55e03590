//! [`MemoryStore`] — an in-memory [`ClinicalStore`] used by tests and by
//! deployments that run against a simulated backend.
//!
//! Enforces the same uniqueness constraints as the SQLite schema so the
//! timeline service behaves identically against either backend. Explicitly
//! constructed and injected; there is no module-level state.

use std::sync::{Mutex, PoisonError};

use chrono::{NaiveDate, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::{
  checklist::{NewChecklist, PostMatchChecklist},
  injury::{Injury, NewInjury},
  player::{NewPlayer, Player},
  status::{DailyStatusEntry, NewDailyStatus},
  store::{ClinicalStore, InjuryDateField, StoreError},
};

// ─── Error ───────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum MemoryError {
  #[error("unique constraint violated on {0}")]
  UniqueViolation(&'static str),
}

impl StoreError for MemoryError {
  fn is_unique_violation(&self) -> bool {
    matches!(self, Self::UniqueViolation(_))
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Inner {
  players:    Vec<Player>,
  injuries:   Vec<Injury>,
  entries:    Vec<DailyStatusEntry>,
  checklists: Vec<PostMatchChecklist>,
}

/// An in-memory clinical store guarded by a single mutex. All operations are
/// short and synchronous, so contention is not a concern at this scale.
#[derive(Default)]
pub struct MemoryStore {
  inner: Mutex<Inner>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
    self.inner.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl ClinicalStore for MemoryStore {
  type Error = MemoryError;

  // ── Players ───────────────────────────────────────────────────────────

  async fn add_player(&self, input: NewPlayer) -> Result<Player, MemoryError> {
    let player = Player {
      player_id:  Uuid::new_v4(),
      name:       input.name,
      rut:        input.rut,
      birth_date: input.birth_date,
      division:   input.division,
      photo:      input.photo,
      active:     true,
      created_at: Utc::now(),
    };
    self.lock().players.push(player.clone());
    Ok(player)
  }

  async fn get_player(&self, id: Uuid) -> Result<Option<Player>, MemoryError> {
    Ok(self.lock().players.iter().find(|p| p.player_id == id).cloned())
  }

  async fn list_players(
    &self,
    active: Option<bool>,
  ) -> Result<Vec<Player>, MemoryError> {
    Ok(
      self
        .lock()
        .players
        .iter()
        .filter(|p| active.is_none_or(|a| p.active == a))
        .cloned()
        .collect(),
    )
  }

  async fn deactivate_player(
    &self,
    id: Uuid,
  ) -> Result<Option<Player>, MemoryError> {
    let mut inner = self.lock();
    match inner.players.iter_mut().find(|p| p.player_id == id) {
      Some(p) => {
        p.active = false;
        Ok(Some(p.clone()))
      }
      None => Ok(None),
    }
  }

  async fn set_player_photo(
    &self,
    id: Uuid,
    photo: String,
  ) -> Result<Option<Player>, MemoryError> {
    let mut inner = self.lock();
    match inner.players.iter_mut().find(|p| p.player_id == id) {
      Some(p) => {
        p.photo = Some(photo);
        Ok(Some(p.clone()))
      }
      None => Ok(None),
    }
  }

  // ── Injuries ──────────────────────────────────────────────────────────

  async fn add_injury(&self, input: NewInjury) -> Result<Injury, MemoryError> {
    let injury = Injury {
      injury_id:   Uuid::new_v4(),
      player_id:   input.player_id,
      diagnosis:   input.diagnosis,
      injury_type: input.injury_type,
      body_region: input.body_region,
      severity:    input.severity,
      mechanism:   input.mechanism,
      estimated_recovery_days: input.estimated_recovery_days,
      start_date:  input.start_date,
      end_date:    None,
      actual_recovery_days: None,
      active:      true,
    };
    self.lock().injuries.push(injury.clone());
    Ok(injury)
  }

  async fn get_injury(&self, id: Uuid) -> Result<Option<Injury>, MemoryError> {
    Ok(self.lock().injuries.iter().find(|i| i.injury_id == id).cloned())
  }

  async fn find_injuries_by_active_flag(
    &self,
    active: bool,
  ) -> Result<Vec<Injury>, MemoryError> {
    Ok(
      self
        .lock()
        .injuries
        .iter()
        .filter(|i| i.active == active)
        .cloned()
        .collect(),
    )
  }

  async fn finalize_injury(
    &self,
    id: Uuid,
    end_date: NaiveDate,
    actual_recovery_days: i64,
  ) -> Result<Option<Injury>, MemoryError> {
    let mut inner = self.lock();
    match inner.injuries.iter_mut().find(|i| i.injury_id == id) {
      Some(i) => {
        i.active = false;
        i.end_date = Some(end_date);
        i.actual_recovery_days = Some(actual_recovery_days);
        Ok(Some(i.clone()))
      }
      None => Ok(None),
    }
  }

  async fn find_injuries_by_date_range(
    &self,
    field: InjuryDateField,
    start: NaiveDate,
    end: NaiveDate,
  ) -> Result<Vec<Injury>, MemoryError> {
    Ok(
      self
        .lock()
        .injuries
        .iter()
        .filter(|i| {
          let date = match field {
            InjuryDateField::StartDate => Some(i.start_date),
            InjuryDateField::EndDate => i.end_date,
          };
          date.is_some_and(|d| start <= d && d <= end)
        })
        .cloned()
        .collect(),
    )
  }

  // ── Daily entries ─────────────────────────────────────────────────────

  async fn insert_daily_entry(
    &self,
    input: NewDailyStatus,
  ) -> Result<DailyStatusEntry, MemoryError> {
    let mut inner = self.lock();
    if inner
      .entries
      .iter()
      .any(|e| e.injury_id == input.injury_id && e.date == input.date)
    {
      return Err(MemoryError::UniqueViolation("daily_entries(injury_id, fecha)"));
    }
    let entry = DailyStatusEntry {
      entry_id:    Uuid::new_v4(),
      injury_id:   input.injury_id,
      date:        input.date,
      state:       input.state,
      observation: input.observation,
      recorded_by: input.recorded_by,
      recorded_at: Utc::now(),
    };
    inner.entries.push(entry.clone());
    Ok(entry)
  }

  async fn find_daily_entries_by_injury(
    &self,
    injury_id: Uuid,
  ) -> Result<Vec<DailyStatusEntry>, MemoryError> {
    let mut entries: Vec<_> = self
      .lock()
      .entries
      .iter()
      .filter(|e| e.injury_id == injury_id)
      .cloned()
      .collect();
    entries.sort_by_key(|e| e.date);
    Ok(entries)
  }

  async fn find_daily_entries_by_date_range(
    &self,
    start: NaiveDate,
    end: NaiveDate,
  ) -> Result<Vec<DailyStatusEntry>, MemoryError> {
    Ok(
      self
        .lock()
        .entries
        .iter()
        .filter(|e| start <= e.date && e.date <= end)
        .cloned()
        .collect(),
    )
  }

  // ── Checklists ────────────────────────────────────────────────────────

  async fn add_checklist(
    &self,
    input: NewChecklist,
  ) -> Result<PostMatchChecklist, MemoryError> {
    let mut inner = self.lock();
    if inner
      .checklists
      .iter()
      .any(|c| c.player_id == input.player_id && c.match_id == input.match_id)
    {
      return Err(MemoryError::UniqueViolation("checklists(player_id, match_id)"));
    }
    let checklist = PostMatchChecklist {
      checklist_id: Uuid::new_v4(),
      player_id:    input.player_id,
      match_id:     input.match_id,
      match_date:   input.match_date,
      has_pain:     input.has_pain,
      pain_intensity: input.pain_intensity,
      pain_zone:    input.pain_zone,
      mechanism:    input.mechanism,
      phase_of_appearance: input.phase_of_appearance,
      presumptive_diagnosis: input.presumptive_diagnosis,
      immediate_treatment: input.immediate_treatment,
      observations: input.observations,
      recorded_by:  input.recorded_by,
      recorded_at:  Utc::now(),
    };
    inner.checklists.push(checklist.clone());
    Ok(checklist)
  }

  async fn list_checklists_for_player(
    &self,
    player_id: Uuid,
  ) -> Result<Vec<PostMatchChecklist>, MemoryError> {
    Ok(
      self
        .lock()
        .checklists
        .iter()
        .filter(|c| c.player_id == player_id)
        .cloned()
        .collect(),
    )
  }
}
