//! Merge the actual and forecast series into the combined response rows.
//!
//! The reconciler applies the display-level policies — 2-decimal rounding,
//! forecast non-negativity, trend only for the decomposition strategy — and
//! nothing else. It never fits anything and cannot raise a forecasting error.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::domain::{
    ActualPoint, CombinedPoint, ForecastMethod, ForecastResponse,
};
use crate::forecast::ForecastOutcome;

/// Build one row per distinct month across both series, ascending.
pub fn reconcile(actual: &[ActualPoint], outcome: &ForecastOutcome) -> Vec<CombinedPoint> {
    let actual_by_date: BTreeMap<NaiveDate, f64> =
        actual.iter().map(|p| (p.date, p.value)).collect();
    let forecast_by_date: BTreeMap<NaiveDate, (f64, Option<f64>)> = outcome
        .points
        .iter()
        .map(|p| (p.date, (p.predicted, p.trend)))
        .collect();

    let dates: BTreeSet<NaiveDate> = actual_by_date
        .keys()
        .chain(forecast_by_date.keys())
        .copied()
        .collect();

    dates
        .into_iter()
        .map(|date| {
            let actual = actual_by_date.get(&date).map(|&v| round2(v));
            // Expenses cannot be negative; clamp after rounding.
            let forecast = forecast_by_date
                .get(&date)
                .map(|&(predicted, _)| round2(predicted).max(0.0));
            let trend = if outcome.method == ForecastMethod::Decomposition {
                forecast_by_date
                    .get(&date)
                    .and_then(|&(_, trend)| trend)
                    .map(round2)
            } else {
                None
            };
            CombinedPoint {
                date,
                actual,
                forecast,
                trend,
            }
        })
        .collect()
}

/// Assemble the full query response.
pub fn build_response(actual: &[ActualPoint], outcome: &ForecastOutcome) -> ForecastResponse {
    ForecastResponse {
        method: outcome.method.label().to_string(),
        data: reconcile(actual, outcome),
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ForecastPoint;
    use chrono::NaiveDate;

    fn date(year: i32, month: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, 1).unwrap()
    }

    fn actuals(pairs: &[(i32, u32, f64)]) -> Vec<ActualPoint> {
        pairs
            .iter()
            .map(|&(y, m, value)| ActualPoint {
                date: date(y, m),
                value,
            })
            .collect()
    }

    #[test]
    fn rows_cover_the_union_of_dates_in_order() {
        let actual = actuals(&[(2024, 1, 100.0), (2024, 2, 110.0)]);
        let outcome = ForecastOutcome {
            method: ForecastMethod::FlatAverage,
            points: vec![
                ForecastPoint {
                    date: date(2024, 2),
                    predicted: 105.0,
                    trend: None,
                },
                ForecastPoint {
                    date: date(2024, 3),
                    predicted: 105.0,
                    trend: None,
                },
            ],
        };

        let rows = reconcile(&actual, &outcome);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].date, date(2024, 1));
        assert_eq!(rows[2].date, date(2024, 3));
        // Month with only an actual.
        assert_eq!(rows[0].actual, Some(100.0));
        assert_eq!(rows[0].forecast, None);
        // Month with only a forecast.
        assert_eq!(rows[2].actual, None);
        assert_eq!(rows[2].forecast, Some(105.0));
    }

    #[test]
    fn values_round_to_two_decimals() {
        let actual = actuals(&[(2024, 1, 123.456)]);
        let outcome = ForecastOutcome {
            method: ForecastMethod::Decomposition,
            points: vec![ForecastPoint {
                date: date(2024, 1),
                predicted: 99.999,
                trend: Some(100.005),
            }],
        };
        let rows = reconcile(&actual, &outcome);
        assert_eq!(rows[0].actual, Some(123.46));
        assert_eq!(rows[0].forecast, Some(100.0));
        assert_eq!(rows[0].trend, Some(100.01));
    }

    #[test]
    fn negative_forecasts_clamp_to_zero() {
        let outcome = ForecastOutcome {
            method: ForecastMethod::Decomposition,
            points: vec![ForecastPoint {
                date: date(2024, 1),
                predicted: -42.7,
                trend: Some(-40.0),
            }],
        };
        let rows = reconcile(&[], &outcome);
        assert_eq!(rows[0].forecast, Some(0.0));
        // The trend component is reported as-is; only the forecast is clamped.
        assert_eq!(rows[0].trend, Some(-40.0));
    }

    #[test]
    fn trend_is_gated_on_the_decomposition_method() {
        let point = ForecastPoint {
            date: date(2024, 1),
            predicted: 50.0,
            trend: Some(48.0),
        };
        let decomposed = ForecastOutcome {
            method: ForecastMethod::Decomposition,
            points: vec![point.clone()],
        };
        let fallback = ForecastOutcome {
            method: ForecastMethod::Fallback,
            points: vec![point],
        };
        assert_eq!(reconcile(&[], &decomposed)[0].trend, Some(48.0));
        assert_eq!(reconcile(&[], &fallback)[0].trend, None);
    }

    #[test]
    fn response_carries_the_method_label() {
        let outcome = ForecastOutcome {
            method: ForecastMethod::FlatAverage,
            points: vec![],
        };
        let response = build_response(&[], &outcome);
        assert_eq!(response.method, "Statistical Average (Smoothed)");
        assert!(response.data.is_empty());
    }
}
