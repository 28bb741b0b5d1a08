//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Selection parameters and reference-date helpers."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::period::Period;

/// Days before today the date selector accepts.
pub const SELECTION_WINDOW_DAYS: i64 = 365;

/// Period and date chosen at the presentation boundary.
///
/// A `None` date means "live": producers anchor on the current instant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Selection {
    #[serde(default)]
    pub period: Period,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl Selection {
    pub fn new(period: Period, date: Option<NaiveDate>) -> Self {
        Self { period, date }
    }

    /// Instant the producers anchor their series on.
    pub fn reference(&self) -> DateTime<Utc> {
        reference_instant(self.date)
    }

    /// Human readable description of the covered range.
    pub fn label(&self) -> String {
        let date = self.date.unwrap_or_else(|| Utc::now().date_naive());
        period_label(self.period, date)
    }
}

/// Resolve a selected calendar date to the instant series are anchored on.
///
/// A selected date stands for the end of that day (23:59:59 UTC); no date
/// resolves to now.
pub fn reference_instant(date: Option<NaiveDate>) -> DateTime<Utc> {
    match date {
        Some(date) => end_of_day(date),
        None => Utc::now(),
    }
}

fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    let time = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
    date.and_time(time).and_utc()
}

/// Describe the range covered by `period` ending on `date`.
pub fn period_label(period: Period, date: NaiveDate) -> String {
    let formatted = date.format("%b %-d, %Y").to_string();
    match period {
        Period::Daily => formatted,
        Period::Weekly => format!("7 days ending {formatted}"),
        Period::Monthly => format!("30 days ending {formatted}"),
        Period::Yearly => format!("12 months ending {formatted}"),
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("selected date {date} is after today ({today})")]
    InFuture { date: NaiveDate, today: NaiveDate },
    #[error("selected date {date} is before the earliest selectable date {earliest}")]
    TooOld {
        date: NaiveDate,
        earliest: NaiveDate,
    },
}

/// Range of dates the selector offers, ending today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionWindow {
    pub earliest: NaiveDate,
    pub latest: NaiveDate,
}

impl SelectionWindow {
    pub fn ending(today: NaiveDate) -> Self {
        Self {
            earliest: today - Duration::days(SELECTION_WINDOW_DAYS),
            latest: today,
        }
    }

    pub fn today() -> Self {
        Self::ending(Utc::now().date_naive())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.validate(date).is_ok()
    }

    pub fn validate(&self, date: NaiveDate) -> Result<NaiveDate, SelectionError> {
        if date > self.latest {
            return Err(SelectionError::InFuture {
                date,
                today: self.latest,
            });
        }
        if date < self.earliest {
            return Err(SelectionError::TooOld {
                date,
                earliest: self.earliest,
            });
        }
        Ok(date)
    }
}
