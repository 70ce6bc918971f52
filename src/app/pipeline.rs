//! The forecast query pipeline.
//!
//! One function owns the whole request-scoped flow:
//! store fetch -> aggregation -> conditioning -> strategy selection -> reconcile
//!
//! Each stage produces a fresh collection; nothing is shared between queries,
//! so concurrent queries for different buildings need no coordination. Keeping
//! the flow here (rather than in the CLI layer) keeps it reusable by any
//! serving front-end.

use chrono::NaiveDate;

use crate::data::ExpenseStore;
use crate::domain::ForecastResponse;
use crate::error::ApiError;
use crate::forecast::select_and_forecast;
use crate::report::build_response;
use crate::series::{aggregate, condition, last_actual_date};

/// Reserved identifier for "every building"; aggregate forecasts are
/// explicitly unsupported.
const AGGREGATE_SENTINEL: &str = "all";

/// Run one forecast query.
///
/// `now` is the processing date: ledger rows dated after it are ignored and
/// the 12-month horizon starts after the last observed month. Callers pass it
/// explicitly so results are reproducible.
pub fn run_forecast(
    store: &dyn ExpenseStore,
    building_id: &str,
    now: NaiveDate,
) -> Result<ForecastResponse, ApiError> {
    let building_id = building_id.trim();
    if building_id.is_empty() || building_id == AGGREGATE_SENTINEL {
        return Err(ApiError::bad_request(
            "Select a single building; aggregate forecasts are not supported.",
        ));
    }

    let rows = store.fetch_expenses(building_id)?;
    let actual = aggregate(&rows, now)?;
    let training = condition(&actual);
    let outcome = select_and_forecast(&training, last_actual_date(&actual));

    Ok(build_response(&actual, &outcome))
}
