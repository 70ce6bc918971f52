//! Reconciliation of actual vs. forecast series and terminal formatting.

pub mod format;
pub mod reconcile;

pub use format::*;
pub use reconcile::*;
