//! Series construction: ledger aggregation and training conditioning.
//!
//! Responsibilities:
//!
//! - reduce raw ledger rows to one value per calendar month
//! - derive the capped + smoothed training copy used for fitting

pub mod aggregate;
pub mod condition;

pub use aggregate::*;
pub use condition::*;
