//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory through the pipeline stages
//! - rendered to the JSON response shape
//! - inspected in tests without conversion helpers
//!
//! Each pipeline stage owns the collection it produces; in particular the
//! actual series reaches the reconciler untouched even though a conditioned
//! copy of it is what the model was fit on.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A raw ledger row as returned by the expense store.
///
/// Field names follow the store's wire shape (`current_month` is the billed
/// amount for that month, `type` the expense category). Several rows may share
/// one `(year, month)`; aggregation sums them.
#[derive(Debug, Clone, Deserialize)]
pub struct ExpenseRow {
    pub year: i32,
    /// Calendar month, 1–12.
    pub month: u32,
    #[serde(rename = "current_month")]
    pub amount: f64,
    #[serde(rename = "type")]
    pub category: String,
}

/// One observed month: the summed ledger amount keyed by the month's first day.
#[derive(Debug, Clone, PartialEq)]
pub struct ActualPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// One month of the conditioned series used for model fitting.
///
/// Derived 1:1 from `ActualPoint` by outlier capping and smoothing; never
/// shown to callers.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// One predicted month. `trend` is present only for the decomposition model.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted: f64,
    pub trend: Option<f64>,
}

/// Which forecasting strategy produced the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastMethod {
    /// Flat historical mean; used when the training series is short.
    FlatAverage,
    /// Trend + seasonality decomposition over the full history.
    Decomposition,
    /// Degraded single-point result after a fit failure.
    Fallback,
}

impl ForecastMethod {
    /// Human-readable label reported in the response `method` field.
    pub fn label(self) -> &'static str {
        match self {
            ForecastMethod::FlatAverage => "Statistical Average (Smoothed)",
            ForecastMethod::Decomposition => "Trend+Seasonality Model (12 Months + Full History)",
            ForecastMethod::Fallback => "Fallback",
        }
    }
}

/// A reconciled output row: one per distinct month across both series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedPoint {
    #[serde(serialize_with = "ser_month_key")]
    pub date: NaiveDate,
    pub actual: Option<f64>,
    pub forecast: Option<f64>,
    pub trend: Option<f64>,
}

/// The full query response: strategy label plus the merged series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResponse {
    pub method: String,
    pub data: Vec<CombinedPoint>,
}

fn ser_month_key<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(&date.format("%Y-%m"))
}
