//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 UTC strings; calendar dates are `YYYY-MM-DD`
//! text, local convention, never routed through UTC midnight. UUIDs are
//! hyphenated lowercase strings. Enums are their lowercase wire names.

use chrono::{DateTime, NaiveDate, Utc};
use fisio_core::{
  checklist::PostMatchChecklist,
  injury::{Injury, InjuryType, Severity},
  player::Player,
  status::{DailyStatusEntry, RecoveryState},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── InjuryType ──────────────────────────────────────────────────────────────

pub fn encode_injury_type(t: InjuryType) -> &'static str {
  match t {
    InjuryType::Muscular => "muscular",
    InjuryType::Articular => "articular",
    InjuryType::Osea => "osea",
    InjuryType::Ligamentosa => "ligamentosa",
    InjuryType::Tendinosa => "tendinosa",
    InjuryType::Otra => "otra",
  }
}

pub fn decode_injury_type(s: &str) -> Result<InjuryType> {
  match s {
    "muscular" => Ok(InjuryType::Muscular),
    "articular" => Ok(InjuryType::Articular),
    "osea" => Ok(InjuryType::Osea),
    "ligamentosa" => Ok(InjuryType::Ligamentosa),
    "tendinosa" => Ok(InjuryType::Tendinosa),
    "otra" => Ok(InjuryType::Otra),
    other => Err(Error::UnknownValue(other.to_owned())),
  }
}

// ─── Severity ────────────────────────────────────────────────────────────────

pub fn encode_severity(s: Severity) -> &'static str {
  match s {
    Severity::Leve => "leve",
    Severity::Moderada => "moderada",
    Severity::Grave => "grave",
  }
}

pub fn decode_severity(s: &str) -> Result<Severity> {
  match s {
    "leve" => Ok(Severity::Leve),
    "moderada" => Ok(Severity::Moderada),
    "grave" => Ok(Severity::Grave),
    other => Err(Error::UnknownValue(other.to_owned())),
  }
}

// ─── RecoveryState ───────────────────────────────────────────────────────────

pub fn encode_state(s: RecoveryState) -> &'static str {
  match s {
    RecoveryState::Camilla => "camilla",
    RecoveryState::Gimnasio => "gimnasio",
    RecoveryState::Reintegro => "reintegro",
  }
}

pub fn decode_state(s: &str) -> Result<RecoveryState> {
  match s {
    "camilla" => Ok(RecoveryState::Camilla),
    "gimnasio" => Ok(RecoveryState::Gimnasio),
    "reintegro" => Ok(RecoveryState::Reintegro),
    other => Err(Error::UnknownValue(other.to_owned())),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `players` row.
pub struct RawPlayer {
  pub player_id:  String,
  pub name:       String,
  pub rut:        String,
  pub birth_date: String,
  pub division:   String,
  pub photo:      Option<String>,
  pub active:     bool,
  pub created_at: String,
}

impl RawPlayer {
  pub fn into_player(self) -> Result<Player> {
    Ok(Player {
      player_id:  decode_uuid(&self.player_id)?,
      name:       self.name,
      rut:        self.rut,
      birth_date: decode_date(&self.birth_date)?,
      division:   self.division,
      photo:      self.photo,
      active:     self.active,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from an `injuries` row.
pub struct RawInjury {
  pub injury_id:      String,
  pub player_id:      String,
  pub diagnosis:      String,
  pub injury_type:    String,
  pub body_region:    String,
  pub severity:       String,
  pub mechanism:      String,
  pub estimated_days: u32,
  pub fecha_lesion:   String,
  pub fecha_fin:      Option<String>,
  pub actual_days:    Option<i64>,
  pub active:         bool,
}

impl RawInjury {
  pub fn into_injury(self) -> Result<Injury> {
    Ok(Injury {
      injury_id:   decode_uuid(&self.injury_id)?,
      player_id:   decode_uuid(&self.player_id)?,
      diagnosis:   self.diagnosis,
      injury_type: decode_injury_type(&self.injury_type)?,
      body_region: self.body_region,
      severity:    decode_severity(&self.severity)?,
      mechanism:   self.mechanism,
      estimated_recovery_days: self.estimated_days,
      start_date:  decode_date(&self.fecha_lesion)?,
      end_date:    self.fecha_fin.as_deref().map(decode_date).transpose()?,
      actual_recovery_days: self.actual_days,
      active:      self.active,
    })
  }
}

/// Raw strings read directly from a `daily_entries` row.
pub struct RawEntry {
  pub entry_id:    String,
  pub injury_id:   String,
  pub fecha:       String,
  pub state:       String,
  pub observation: Option<String>,
  pub recorded_by: String,
  pub recorded_at: String,
}

impl RawEntry {
  pub fn into_entry(self) -> Result<DailyStatusEntry> {
    Ok(DailyStatusEntry {
      entry_id:    decode_uuid(&self.entry_id)?,
      injury_id:   decode_uuid(&self.injury_id)?,
      date:        decode_date(&self.fecha)?,
      state:       decode_state(&self.state)?,
      observation: self.observation,
      recorded_by: self.recorded_by,
      recorded_at: decode_dt(&self.recorded_at)?,
    })
  }
}

/// Raw strings read directly from a `checklists` row.
pub struct RawChecklist {
  pub checklist_id:   String,
  pub player_id:      String,
  pub match_id:       String,
  pub match_date:     String,
  pub has_pain:       bool,
  pub pain_intensity: Option<u8>,
  pub pain_zone:      Option<String>,
  pub mechanism:      Option<String>,
  pub phase:          Option<String>,
  pub diagnosis:      Option<String>,
  pub treatment:      Option<String>,
  pub observations:   Option<String>,
  pub recorded_by:    String,
  pub recorded_at:    String,
}

impl RawChecklist {
  pub fn into_checklist(self) -> Result<PostMatchChecklist> {
    Ok(PostMatchChecklist {
      checklist_id: decode_uuid(&self.checklist_id)?,
      player_id:    decode_uuid(&self.player_id)?,
      match_id:     decode_uuid(&self.match_id)?,
      match_date:   decode_date(&self.match_date)?,
      has_pain:     self.has_pain,
      pain_intensity: self.pain_intensity,
      pain_zone:    self.pain_zone,
      mechanism:    self.mechanism,
      phase_of_appearance: self.phase,
      presumptive_diagnosis: self.diagnosis,
      immediate_treatment: self.treatment,
      observations: self.observations,
      recorded_by:  self.recorded_by,
      recorded_at:  decode_dt(&self.recorded_at)?,
    })
  }
}
