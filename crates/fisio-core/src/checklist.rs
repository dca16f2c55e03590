//! Post-match symptom checklists.
//!
//! One evaluation of one player after one match, immutable after creation.
//! The pain-details invariant lives here, not in any client: intensity and
//! body zone are required together exactly when the pain flag is set.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// A completed post-match evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostMatchChecklist {
  pub checklist_id: Uuid,
  pub player_id:    Uuid,
  pub match_id:     Uuid,
  #[serde(rename = "fecha_partido")]
  pub match_date:   NaiveDate,
  #[serde(rename = "dolor")]
  pub has_pain:     bool,
  /// 1-10; present iff `has_pain`.
  #[serde(rename = "intensidad_dolor")]
  pub pain_intensity: Option<u8>,
  /// Body zone; present iff `has_pain`.
  #[serde(rename = "zona_dolor")]
  pub pain_zone:    Option<String>,
  #[serde(rename = "mecanismo")]
  pub mechanism:    Option<String>,
  #[serde(rename = "fase_aparicion")]
  pub phase_of_appearance: Option<String>,
  #[serde(rename = "diagnostico_presuntivo")]
  pub presumptive_diagnosis: Option<String>,
  #[serde(rename = "tratamiento_inmediato")]
  pub immediate_treatment: Option<String>,
  #[serde(rename = "observaciones")]
  pub observations: Option<String>,
  #[serde(rename = "registrado_por")]
  pub recorded_by:  String,
  pub recorded_at:  DateTime<Utc>,
}

/// Input to [`crate::store::ClinicalStore::add_checklist`].
/// `checklist_id` and `recorded_at` are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewChecklist {
  pub player_id:    Uuid,
  pub match_id:     Uuid,
  pub match_date:   NaiveDate,
  pub has_pain:     bool,
  pub pain_intensity: Option<u8>,
  pub pain_zone:    Option<String>,
  pub mechanism:    Option<String>,
  pub phase_of_appearance: Option<String>,
  pub presumptive_diagnosis: Option<String>,
  pub immediate_treatment: Option<String>,
  pub observations: Option<String>,
  pub recorded_by:  String,
}

impl NewChecklist {
  /// Enforce the pain-details invariant regardless of which client calls.
  pub fn validate(&self) -> Result<()> {
    if self.has_pain {
      let intensity = self.pain_intensity.ok_or(Error::PainDetailsRequired)?;
      if self.pain_zone.as_deref().is_none_or(str::is_empty) {
        return Err(Error::PainDetailsRequired);
      }
      if !(1..=10).contains(&intensity) {
        return Err(Error::PainIntensityOutOfRange(intensity));
      }
    } else if self.pain_intensity.is_some() || self.pain_zone.is_some() {
      return Err(Error::PainDetailsWithoutPain);
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;
  use uuid::Uuid;

  use super::NewChecklist;
  use crate::Error;

  fn base(has_pain: bool) -> NewChecklist {
    NewChecklist {
      player_id: Uuid::new_v4(),
      match_id: Uuid::new_v4(),
      match_date: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
      has_pain,
      pain_intensity: None,
      pain_zone: None,
      mechanism: None,
      phase_of_appearance: None,
      presumptive_diagnosis: None,
      immediate_treatment: None,
      observations: None,
      recorded_by: "dr. soto".into(),
    }
  }

  #[test]
  fn no_pain_no_details_is_valid() {
    assert!(base(false).validate().is_ok());
  }

  #[test]
  fn pain_requires_intensity_and_zone() {
    let mut c = base(true);
    assert!(matches!(c.validate(), Err(Error::PainDetailsRequired)));

    c.pain_intensity = Some(6);
    assert!(matches!(c.validate(), Err(Error::PainDetailsRequired)));

    c.pain_zone = Some("isquiotibial".into());
    assert!(c.validate().is_ok());
  }

  #[test]
  fn intensity_must_be_in_range() {
    let mut c = base(true);
    c.pain_intensity = Some(11);
    c.pain_zone = Some("rodilla".into());
    assert!(matches!(c.validate(), Err(Error::PainIntensityOutOfRange(11))));

    c.pain_intensity = Some(0);
    assert!(matches!(c.validate(), Err(Error::PainIntensityOutOfRange(0))));
  }

  #[test]
  fn details_without_pain_flag_are_rejected() {
    let mut c = base(false);
    c.pain_intensity = Some(3);
    assert!(matches!(c.validate(), Err(Error::PainDetailsWithoutPain)));
  }
}
