//! Forecasting: strategy selection and the decomposition model.
//!
//! Responsibilities:
//!
//! - pick the flat-average or decomposition strategy by training length
//! - run the trend + seasonality fit and generate the forecast series
//! - convert fit failures into the degraded fallback outcome

pub mod decompose;
pub mod selector;

pub use selector::*;
