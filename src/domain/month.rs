//! Calendar-month key helpers.
//!
//! The whole pipeline works at month granularity: every date is normalized to
//! the first day of its month, which doubles as the join key between actual
//! and forecast series.

use chrono::{Datelike, Months, NaiveDate};

/// Normalize a raw `(year, month)` pair to the month's first day.
///
/// Returns `None` when the pair is not a valid calendar date (month 0, 13, …).
pub fn month_start(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Normalize any date to the first day of its month.
pub fn month_key(date: NaiveDate) -> NaiveDate {
    // Day 1 always exists for a valid year/month.
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

/// The month key `n` months after `date` (which must itself be a month key).
pub fn add_months(date: NaiveDate, n: u32) -> NaiveDate {
    date.checked_add_months(Months::new(n)).unwrap_or(date)
}

/// The `horizon` consecutive month keys strictly after `last`.
pub fn months_after(last: NaiveDate, horizon: usize) -> Vec<NaiveDate> {
    let last = month_key(last);
    (1..=horizon as u32).map(|k| add_months(last, k)).collect()
}
