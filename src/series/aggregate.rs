//! Ledger aggregation into the monthly actual series.
//!
//! This module is responsible for turning raw store rows into a clean set of
//! one-value-per-month points that are safe to condition and fit.
//!
//! Design goals:
//! - **Row-level validation** with clear errors (an unreadable `(year, month)`
//!   is an upstream-shape problem, not a not-found condition)
//! - **Deterministic behavior**: "now" is an explicit argument, never read
//!   from the clock here
//! - **Separation of concerns**: no capping/smoothing logic in this module

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::{month_key, month_start, ActualPoint, ExpenseRow};
use crate::error::ApiError;

/// Reduce raw ledger rows to the actual monthly series.
///
/// Rows dated strictly after `now` (future-dated ledger entries) are dropped
/// before aggregation. Amounts sharing a `(year, month)` are summed. Output is
/// ascending by date with at most one point per calendar month.
pub fn aggregate(rows: &[ExpenseRow], now: NaiveDate) -> Result<Vec<ActualPoint>, ApiError> {
    if rows.is_empty() {
        return Err(ApiError::no_data("No expense records for this building."));
    }

    let mut by_month: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for row in rows {
        let date = month_start(row.year, row.month).ok_or_else(|| {
            ApiError::upstream(format!(
                "Invalid ledger date: year={} month={}.",
                row.year, row.month
            ))
        })?;
        if date > now {
            continue;
        }
        *by_month.entry(date).or_insert(0.0) += row.amount;
    }

    if by_month.is_empty() {
        return Err(ApiError::no_historical_data(
            "Expense records exist, but none are dated on or before now.",
        ));
    }

    Ok(by_month
        .into_iter()
        .map(|(date, value)| ActualPoint { date, value })
        .collect())
}

/// The latest observed month in the actual series.
///
/// The aggregator guarantees a non-empty, ascending series, so this is the
/// last element's date.
pub fn last_actual_date(actual: &[ActualPoint]) -> NaiveDate {
    actual
        .last()
        .map(|p| month_key(p.date))
        .unwrap_or(NaiveDate::MIN)
}
