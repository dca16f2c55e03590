//! Report periods — calendar windows derived from a reference date.
//!
//! Never persisted; computed on demand when a report is requested.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// The granularity of a requested report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
  Diario,
  Semanal,
  Mensual,
  Anual,
}

/// An inclusive `[start, end]` calendar window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
  pub start: NaiveDate,
  pub end:   NaiveDate,
}

impl ReportPeriod {
  /// The window of `kind` containing `reference`.
  ///
  /// - daily: the reference day itself
  /// - weekly: the Sunday-to-Saturday week containing the reference
  /// - monthly: first to last day of the reference month
  /// - annual: Jan 1 to Dec 31 of the reference year
  pub fn containing(kind: ReportKind, reference: NaiveDate) -> Self {
    match kind {
      ReportKind::Diario => Self { start: reference, end: reference },
      ReportKind::Semanal => {
        let back = u64::from(reference.weekday().num_days_from_sunday());
        let start = reference
          .checked_sub_days(Days::new(back))
          .unwrap_or(reference);
        let end = start.checked_add_days(Days::new(6)).unwrap_or(start);
        Self { start, end }
      }
      ReportKind::Mensual => {
        let start = reference.with_day(1).unwrap_or(reference);
        // Last day of the month: day before the first of the next month.
        let end = if reference.month() == 12 {
          NaiveDate::from_ymd_opt(reference.year(), 12, 31)
        } else {
          NaiveDate::from_ymd_opt(reference.year(), reference.month() + 1, 1)
            .and_then(|d| d.checked_sub_days(Days::new(1)))
        }
        .unwrap_or(reference);
        Self { start, end }
      }
      ReportKind::Anual => Self {
        start: NaiveDate::from_ymd_opt(reference.year(), 1, 1)
          .unwrap_or(reference),
        end:   NaiveDate::from_ymd_opt(reference.year(), 12, 31)
          .unwrap_or(reference),
      },
    }
  }

  pub fn contains(&self, date: NaiveDate) -> bool {
    self.start <= date && date <= self.end
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::{ReportKind, ReportPeriod};

  fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
  }

  fn period(kind: ReportKind, reference: &str) -> (String, String) {
    let p = ReportPeriod::containing(kind, d(reference));
    (p.start.to_string(), p.end.to_string())
  }

  #[test]
  fn daily_is_the_single_day() {
    assert_eq!(
      period(ReportKind::Diario, "2024-06-15"),
      ("2024-06-15".into(), "2024-06-15".into())
    );
  }

  #[test]
  fn weekly_runs_sunday_to_saturday() {
    // 2024-06-15 is a Saturday; its week starts the preceding Sunday.
    assert_eq!(
      period(ReportKind::Semanal, "2024-06-15"),
      ("2024-06-09".into(), "2024-06-15".into())
    );
  }

  #[test]
  fn weekly_on_a_sunday_starts_that_day() {
    assert_eq!(
      period(ReportKind::Semanal, "2024-06-09"),
      ("2024-06-09".into(), "2024-06-15".into())
    );
  }

  #[test]
  fn monthly_covers_the_whole_month() {
    assert_eq!(
      period(ReportKind::Mensual, "2024-06-15"),
      ("2024-06-01".into(), "2024-06-30".into())
    );
  }

  #[test]
  fn monthly_handles_december() {
    assert_eq!(
      period(ReportKind::Mensual, "2024-12-15"),
      ("2024-12-01".into(), "2024-12-31".into())
    );
  }

  #[test]
  fn monthly_handles_leap_february() {
    assert_eq!(
      period(ReportKind::Mensual, "2024-02-10"),
      ("2024-02-01".into(), "2024-02-29".into())
    );
  }

  #[test]
  fn annual_covers_the_whole_year() {
    assert_eq!(
      period(ReportKind::Anual, "2024-06-15"),
      ("2024-01-01".into(), "2024-12-31".into())
    );
  }

  #[test]
  fn contains_is_inclusive_at_both_ends() {
    let p = ReportPeriod::containing(ReportKind::Mensual, d("2024-06-15"));
    assert!(p.contains(d("2024-06-01")));
    assert!(p.contains(d("2024-06-30")));
    assert!(!p.contains(d("2024-07-01")));
  }
}
