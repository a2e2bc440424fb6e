use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::ForecastError;

/// Inclusive date range `[start, end]` the forecast is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Horizon {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Horizon {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ForecastError> {
        if end <= start {
            return Err(ForecastError::Validation(
                "horizon end must be after start".into(),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of calendar months the horizon touches.
    pub fn month_count(&self) -> u32 {
        (month_index(self.end) - month_index(self.start) + 1) as u32
    }

    /// First-of-month dates for every calendar month the horizon touches,
    /// in order.
    pub fn months(&self) -> impl Iterator<Item = NaiveDate> {
        (month_index(self.start)..=month_index(self.end)).map(first_of_month)
    }
}

/// Zero-based month counter (year * 12 + month) used for gap-free month
/// iteration and drift-free monthly stepping.
pub(crate) fn month_index(date: NaiveDate) -> i32 {
    date.year() * 12 + date.month() as i32 - 1
}

pub(crate) fn first_of_month(index: i32) -> NaiveDate {
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
}

pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    let first = match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(date) => date,
        None => return 28,
    };
    let next = first_of_month(month_index(first) + 1);
    (next - first).num_days() as u32
}
