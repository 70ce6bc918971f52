//! Forecast strategy selection.
//!
//! A single decision on training-series length, then an optional fallback:
//!
//! - fewer than 5 points: decomposition models with seasonal terms are
//!   unreliable on a handful of observations, so project the flat training
//!   mean instead
//! - 5 or more points: fit the trend + seasonality decomposition over the
//!   full history
//! - if that fit or its prediction fails for any reason, degrade to a single
//!   mean-valued point at the last observed month — the one place an internal
//!   error is swallowed rather than propagated

use chrono::NaiveDate;

use crate::domain::{months_after, ForecastMethod, ForecastPoint, TrainingPoint};
use crate::forecast::decompose;

/// Fixed forecast horizon in monthly periods. Policy, not caller-configurable.
pub const HORIZON_MONTHS: usize = 12;

/// Training series shorter than this take the flat-average branch.
const LOW_DATA_CUTOFF: usize = 5;

/// The chosen strategy and the forecast series it produced.
#[derive(Debug, Clone)]
pub struct ForecastOutcome {
    pub method: ForecastMethod,
    pub points: Vec<ForecastPoint>,
}

/// Choose a strategy for the training series and run it.
///
/// `last_actual` is the latest observed month; future periods always start
/// right after it. Infallible at this boundary: fit failures become the
/// fallback outcome, never an error.
pub fn select_and_forecast(training: &[TrainingPoint], last_actual: NaiveDate) -> ForecastOutcome {
    if training.len() < LOW_DATA_CUTOFF {
        return flat_average(training, last_actual);
    }

    match run_decomposition(training, last_actual) {
        Ok(points) => ForecastOutcome {
            method: ForecastMethod::Decomposition,
            points,
        },
        Err(_) => fallback(training, last_actual),
    }
}

fn run_decomposition(
    training: &[TrainingPoint],
    last_actual: NaiveDate,
) -> Result<Vec<ForecastPoint>, decompose::FitError> {
    let model = decompose::fit(training)?;

    let mut dates: Vec<NaiveDate> = training.iter().map(|p| p.date).collect();
    dates.extend(months_after(last_actual, HORIZON_MONTHS));

    model.predict(&dates)
}

/// Flat-average strategy: the training mean at every training date plus each
/// of the next 12 months.
///
/// Past dates deliberately carry the smoothed-series mean, not a backtest of
/// raw values; the reconciler shows raw actuals alongside.
fn flat_average(training: &[TrainingPoint], last_actual: NaiveDate) -> ForecastOutcome {
    let mean = training_mean(training);

    let mut points: Vec<ForecastPoint> = training
        .iter()
        .map(|p| ForecastPoint {
            date: p.date,
            predicted: mean,
            trend: None,
        })
        .collect();
    points.extend(
        months_after(last_actual, HORIZON_MONTHS)
            .into_iter()
            .map(|date| ForecastPoint {
                date,
                predicted: mean,
                trend: None,
            }),
    );

    ForecastOutcome {
        method: ForecastMethod::FlatAverage,
        points,
    }
}

/// Degraded result after a fit failure: exactly one mean-valued point at the
/// last observed month.
fn fallback(training: &[TrainingPoint], last_actual: NaiveDate) -> ForecastOutcome {
    ForecastOutcome {
        method: ForecastMethod::Fallback,
        points: vec![ForecastPoint {
            date: last_actual,
            predicted: training_mean(training),
            trend: None,
        }],
    }
}

fn training_mean(training: &[TrainingPoint]) -> f64 {
    if training.is_empty() {
        return 0.0;
    }
    training.iter().map(|p| p.value).sum::<f64>() / training.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn monthly_series(values: &[f64]) -> Vec<TrainingPoint> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| TrainingPoint {
                date: start
                    .checked_add_months(chrono::Months::new(i as u32))
                    .unwrap(),
                value,
            })
            .collect()
    }

    #[test]
    fn low_data_projects_the_flat_mean() {
        let training = monthly_series(&[100.0, 110.0, 105.0]);
        let last = training[2].date;
        let outcome = select_and_forecast(&training, last);

        assert_eq!(outcome.method, ForecastMethod::FlatAverage);
        assert_eq!(outcome.points.len(), 3 + HORIZON_MONTHS);
        for p in &outcome.points {
            assert!((p.predicted - 105.0).abs() < 1e-12);
            assert!(p.trend.is_none());
        }
        // Future periods start right after the last actual month.
        assert_eq!(
            outcome.points[3].date,
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()
        );
        assert_eq!(
            outcome.points.last().unwrap().date,
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
        );
    }

    #[test]
    fn sufficient_data_runs_the_decomposition() {
        let training = monthly_series(&[200.0, 205.0, 195.0, 210.0, 198.0, 202.0]);
        let last = training[5].date;
        let outcome = select_and_forecast(&training, last);

        assert_eq!(outcome.method, ForecastMethod::Decomposition);
        assert_eq!(outcome.points.len(), 6 + HORIZON_MONTHS);
        assert!(outcome.points.iter().all(|p| p.trend.is_some()));
    }

    #[test]
    fn cutoff_is_exactly_five_points() {
        let four = monthly_series(&[100.0; 4]);
        assert_eq!(
            select_and_forecast(&four, four[3].date).method,
            ForecastMethod::FlatAverage
        );
        let five = monthly_series(&[100.0; 5]);
        assert_eq!(
            select_and_forecast(&five, five[4].date).method,
            ForecastMethod::Decomposition
        );
    }

    #[test]
    fn fit_failure_degrades_to_single_point_fallback() {
        let mut training = monthly_series(&[200.0; 6]);
        training[2].value = f64::NAN;
        let last = training[5].date;
        let outcome = select_and_forecast(&training, last);

        assert_eq!(outcome.method, ForecastMethod::Fallback);
        assert_eq!(outcome.points.len(), 1);
        assert_eq!(outcome.points[0].date, last);
        assert!(outcome.points[0].trend.is_none());
    }

    #[test]
    fn forecast_covers_history_plus_horizon() {
        let training = monthly_series(&[150.0; 9]);
        let outcome = select_and_forecast(&training, training[8].date);
        let history: Vec<_> = training.iter().map(|p| p.date).collect();
        let emitted: Vec<_> = outcome.points.iter().map(|p| p.date).collect();
        assert_eq!(&emitted[..9], &history[..]);
        assert_eq!(emitted.len(), 9 + HORIZON_MONTHS);
    }
}
