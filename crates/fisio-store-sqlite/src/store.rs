//! [`SqliteStore`] — the SQLite implementation of [`ClinicalStore`].

use std::path::Path;

use chrono::{NaiveDate, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use fisio_core::{
  checklist::{NewChecklist, PostMatchChecklist},
  injury::{Injury, NewInjury},
  player::{NewPlayer, Player},
  status::{DailyStatusEntry, NewDailyStatus},
  store::{ClinicalStore, InjuryDateField},
};

use crate::{
  Error, Result,
  encode::{
    RawChecklist, RawEntry, RawInjury, RawPlayer, encode_date, encode_dt,
    encode_injury_type, encode_severity, encode_state, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Row mappers ─────────────────────────────────────────────────────────────

const PLAYER_COLS: &str =
  "player_id, name, rut, birth_date, division, photo, active, created_at";

const INJURY_COLS: &str = "injury_id, player_id, diagnosis, injury_type, \
   body_region, severity, mechanism, estimated_days, fecha_lesion, \
   fecha_fin, actual_days, active";

const ENTRY_COLS: &str =
  "entry_id, injury_id, fecha, state, observation, recorded_by, recorded_at";

const CHECKLIST_COLS: &str = "checklist_id, player_id, match_id, match_date, \
   has_pain, pain_intensity, pain_zone, mechanism, phase, diagnosis, \
   treatment, observations, recorded_by, recorded_at";

fn raw_player(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawPlayer> {
  Ok(RawPlayer {
    player_id:  row.get(0)?,
    name:       row.get(1)?,
    rut:        row.get(2)?,
    birth_date: row.get(3)?,
    division:   row.get(4)?,
    photo:      row.get(5)?,
    active:     row.get(6)?,
    created_at: row.get(7)?,
  })
}

fn raw_injury(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawInjury> {
  Ok(RawInjury {
    injury_id:      row.get(0)?,
    player_id:      row.get(1)?,
    diagnosis:      row.get(2)?,
    injury_type:    row.get(3)?,
    body_region:    row.get(4)?,
    severity:       row.get(5)?,
    mechanism:      row.get(6)?,
    estimated_days: row.get(7)?,
    fecha_lesion:   row.get(8)?,
    fecha_fin:      row.get(9)?,
    actual_days:    row.get(10)?,
    active:         row.get(11)?,
  })
}

fn raw_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawEntry> {
  Ok(RawEntry {
    entry_id:    row.get(0)?,
    injury_id:   row.get(1)?,
    fecha:       row.get(2)?,
    state:       row.get(3)?,
    observation: row.get(4)?,
    recorded_by: row.get(5)?,
    recorded_at: row.get(6)?,
  })
}

fn raw_checklist(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawChecklist> {
  Ok(RawChecklist {
    checklist_id:   row.get(0)?,
    player_id:      row.get(1)?,
    match_id:       row.get(2)?,
    match_date:     row.get(3)?,
    has_pain:       row.get(4)?,
    pain_intensity: row.get(5)?,
    pain_zone:      row.get(6)?,
    mechanism:      row.get(7)?,
    phase:          row.get(8)?,
    diagnosis:      row.get(9)?,
    treatment:      row.get(10)?,
    observations:   row.get(11)?,
    recorded_by:    row.get(12)?,
    recorded_at:    row.get(13)?,
  })
}

/// Translate a constraint failure on INSERT into [`Error::UniqueViolation`].
fn check_unique(
  result: rusqlite::Result<usize>,
  constraint: &'static str,
) -> Result<()> {
  match result {
    Ok(_) => Ok(()),
    Err(rusqlite::Error::SqliteFailure(f, _))
      if f.code == rusqlite::ErrorCode::ConstraintViolation =>
    {
      Err(Error::UniqueViolation(constraint))
    }
    Err(e) => Err(Error::Database(e.into())),
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A fisio clinical store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ClinicalStore impl ──────────────────────────────────────────────────────

impl ClinicalStore for SqliteStore {
  type Error = Error;

  // ── Players ───────────────────────────────────────────────────────────────

  async fn add_player(&self, input: NewPlayer) -> Result<Player> {
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

    let id_str    = encode_uuid(player.player_id);
    let name      = player.name.clone();
    let rut       = player.rut.clone();
    let birth_str = encode_date(player.birth_date);
    let division  = player.division.clone();
    let photo     = player.photo.clone();
    let at_str    = encode_dt(player.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO players (
             player_id, name, rut, birth_date, division, photo, active, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7)",
          rusqlite::params![id_str, name, rut, birth_str, division, photo, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(player)
  }

  async fn get_player(&self, id: Uuid) -> Result<Option<Player>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawPlayer> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PLAYER_COLS} FROM players WHERE player_id = ?1"),
              rusqlite::params![id_str],
              raw_player,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPlayer::into_player).transpose()
  }

  async fn list_players(&self, active: Option<bool>) -> Result<Vec<Player>> {
    let raws: Vec<RawPlayer> = self
      .conn
      .call(move |conn| {
        let rows = if let Some(a) = active {
          let mut stmt = conn.prepare(&format!(
            "SELECT {PLAYER_COLS} FROM players WHERE active = ?1 ORDER BY name"
          ))?;
          stmt
            .query_map(rusqlite::params![a], raw_player)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(&format!(
            "SELECT {PLAYER_COLS} FROM players ORDER BY name"
          ))?;
          stmt
            .query_map([], raw_player)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPlayer::into_player).collect()
  }

  async fn deactivate_player(&self, id: Uuid) -> Result<Option<Player>> {
    let id_str = encode_uuid(id);

    let updated: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE players SET active = 0 WHERE player_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    if updated == 0 {
      return Ok(None);
    }
    self.get_player(id).await
  }

  async fn set_player_photo(
    &self,
    id: Uuid,
    photo: String,
  ) -> Result<Option<Player>> {
    let id_str = encode_uuid(id);

    let updated: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE players SET photo = ?2 WHERE player_id = ?1",
          rusqlite::params![id_str, photo],
        )?)
      })
      .await?;

    if updated == 0 {
      return Ok(None);
    }
    self.get_player(id).await
  }

  // ── Injuries ──────────────────────────────────────────────────────────────

  async fn add_injury(&self, input: NewInjury) -> Result<Injury> {
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

    let id_str        = encode_uuid(injury.injury_id);
    let player_id_str = encode_uuid(injury.player_id);
    let diagnosis     = injury.diagnosis.clone();
    let type_str      = encode_injury_type(injury.injury_type).to_owned();
    let region        = injury.body_region.clone();
    let severity_str  = encode_severity(injury.severity).to_owned();
    let mechanism     = injury.mechanism.clone();
    let estimated     = injury.estimated_recovery_days;
    let start_str     = encode_date(injury.start_date);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO injuries (
             injury_id, player_id, diagnosis, injury_type, body_region,
             severity, mechanism, estimated_days, fecha_lesion,
             fecha_fin, actual_days, active
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, NULL, NULL, 1)",
          rusqlite::params![
            id_str,
            player_id_str,
            diagnosis,
            type_str,
            region,
            severity_str,
            mechanism,
            estimated,
            start_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(injury)
  }

  async fn get_injury(&self, id: Uuid) -> Result<Option<Injury>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawInjury> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {INJURY_COLS} FROM injuries WHERE injury_id = ?1"),
              rusqlite::params![id_str],
              raw_injury,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawInjury::into_injury).transpose()
  }

  async fn find_injuries_by_active_flag(
    &self,
    active: bool,
  ) -> Result<Vec<Injury>> {
    let raws: Vec<RawInjury> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {INJURY_COLS} FROM injuries WHERE active = ?1 \
           ORDER BY fecha_lesion DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![active], raw_injury)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawInjury::into_injury).collect()
  }

  async fn finalize_injury(
    &self,
    id: Uuid,
    end_date: NaiveDate,
    actual_recovery_days: i64,
  ) -> Result<Option<Injury>> {
    let id_str  = encode_uuid(id);
    let end_str = encode_date(end_date);

    let updated: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE injuries
           SET active = 0, fecha_fin = ?2, actual_days = ?3
           WHERE injury_id = ?1",
          rusqlite::params![id_str, end_str, actual_recovery_days],
        )?)
      })
      .await?;

    if updated == 0 {
      return Ok(None);
    }
    self.get_injury(id).await
  }

  async fn find_injuries_by_date_range(
    &self,
    field: InjuryDateField,
    start: NaiveDate,
    end: NaiveDate,
  ) -> Result<Vec<Injury>> {
    // Static column names, safe to interpolate.
    let column = match field {
      InjuryDateField::StartDate => "fecha_lesion",
      InjuryDateField::EndDate => "fecha_fin",
    };
    let start_str = encode_date(start);
    let end_str   = encode_date(end);

    let raws: Vec<RawInjury> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {INJURY_COLS} FROM injuries \
           WHERE {column} IS NOT NULL AND {column} >= ?1 AND {column} <= ?2"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![start_str, end_str], raw_injury)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawInjury::into_injury).collect()
  }

  // ── Daily entries — append-only writes ────────────────────────────────────

  async fn insert_daily_entry(
    &self,
    input: NewDailyStatus,
  ) -> Result<DailyStatusEntry> {
    let entry = DailyStatusEntry {
      entry_id:    Uuid::new_v4(),
      injury_id:   input.injury_id,
      date:        input.date,
      state:       input.state,
      observation: input.observation,
      recorded_by: input.recorded_by,
      recorded_at: Utc::now(),
    };

    let entry_id_str  = encode_uuid(entry.entry_id);
    let injury_id_str = encode_uuid(entry.injury_id);
    let fecha_str     = encode_date(entry.date);
    let state_str     = encode_state(entry.state).to_owned();
    let observation   = entry.observation.clone();
    let recorded_by   = entry.recorded_by.clone();
    let at_str        = encode_dt(entry.recorded_at);

    let insert: rusqlite::Result<usize> = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "INSERT INTO daily_entries (
             entry_id, injury_id, fecha, state, observation, recorded_by, recorded_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            entry_id_str,
            injury_id_str,
            fecha_str,
            state_str,
            observation,
            recorded_by,
            at_str,
          ],
        ))
      })
      .await?;

    check_unique(insert, "daily_entries(injury_id, fecha)")?;
    Ok(entry)
  }

  async fn find_daily_entries_by_injury(
    &self,
    injury_id: Uuid,
  ) -> Result<Vec<DailyStatusEntry>> {
    let id_str = encode_uuid(injury_id);

    let raws: Vec<RawEntry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ENTRY_COLS} FROM daily_entries \
           WHERE injury_id = ?1 ORDER BY fecha ASC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], raw_entry)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEntry::into_entry).collect()
  }

  async fn find_daily_entries_by_date_range(
    &self,
    start: NaiveDate,
    end: NaiveDate,
  ) -> Result<Vec<DailyStatusEntry>> {
    let start_str = encode_date(start);
    let end_str   = encode_date(end);

    let raws: Vec<RawEntry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ENTRY_COLS} FROM daily_entries \
           WHERE fecha >= ?1 AND fecha <= ?2"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![start_str, end_str], raw_entry)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEntry::into_entry).collect()
  }

  // ── Checklists ────────────────────────────────────────────────────────────

  async fn add_checklist(
    &self,
    input: NewChecklist,
  ) -> Result<PostMatchChecklist> {
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

    let id_str        = encode_uuid(checklist.checklist_id);
    let player_id_str = encode_uuid(checklist.player_id);
    let match_id_str  = encode_uuid(checklist.match_id);
    let date_str      = encode_date(checklist.match_date);
    let has_pain      = checklist.has_pain;
    let intensity     = checklist.pain_intensity;
    let zone          = checklist.pain_zone.clone();
    let mechanism     = checklist.mechanism.clone();
    let phase         = checklist.phase_of_appearance.clone();
    let diagnosis     = checklist.presumptive_diagnosis.clone();
    let treatment     = checklist.immediate_treatment.clone();
    let observations  = checklist.observations.clone();
    let recorded_by   = checklist.recorded_by.clone();
    let at_str        = encode_dt(checklist.recorded_at);

    let insert: rusqlite::Result<usize> = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "INSERT INTO checklists (
             checklist_id, player_id, match_id, match_date, has_pain,
             pain_intensity, pain_zone, mechanism, phase, diagnosis,
             treatment, observations, recorded_by, recorded_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
          rusqlite::params![
            id_str,
            player_id_str,
            match_id_str,
            date_str,
            has_pain,
            intensity,
            zone,
            mechanism,
            phase,
            diagnosis,
            treatment,
            observations,
            recorded_by,
            at_str,
          ],
        ))
      })
      .await?;

    check_unique(insert, "checklists(player_id, match_id)")?;
    Ok(checklist)
  }

  async fn list_checklists_for_player(
    &self,
    player_id: Uuid,
  ) -> Result<Vec<PostMatchChecklist>> {
    let id_str = encode_uuid(player_id);

    let raws: Vec<RawChecklist> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {CHECKLIST_COLS} FROM checklists \
           WHERE player_id = ?1 ORDER BY match_date DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], raw_checklist)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawChecklist::into_checklist).collect()
  }
}
