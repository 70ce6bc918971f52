//! Training-series conditioning: outlier capping and smoothing.
//!
//! The conditioned series exists so that a single abnormally large one-off
//! charge (a roof repair, an insurance settlement) cannot dominate the flat
//! average baseline or bias the decomposition model's trend and seasonal
//! terms. The displayed actual series is never modified; conditioning only
//! feeds the fit.
//!
//! Two steps, in order:
//!
//! 1. **Cap**: values above `max(3 × median, 600)` are replaced by the median.
//!    The floor keeps tiny ledgers (median near zero) from capping ordinary
//!    bills.
//! 2. **Smooth**: a centered window-3 moving average, applied only when more
//!    than 4 points exist. The window narrows at the series boundaries so
//!    edge months keep a value instead of being dropped.

use crate::domain::{ActualPoint, TrainingPoint};

/// Absolute floor (currency units) for the capping threshold.
const CAP_FLOOR: f64 = 600.0;

/// Median multiple above which a value counts as an anomalous spike.
const CAP_MEDIAN_MULTIPLE: f64 = 3.0;

/// Smoothing runs only on series longer than this.
const SMOOTH_MIN_LEN: usize = 4;

/// Centered moving-average window width.
const SMOOTH_WINDOW: usize = 3;

/// Derive the training series from the actual series.
///
/// Never fails: the aggregator guarantees at least one point upstream, and
/// every step is total on non-empty input.
pub fn condition(actual: &[ActualPoint]) -> Vec<TrainingPoint> {
    let capped = cap_spikes(actual);
    if capped.len() > SMOOTH_MIN_LEN {
        smooth(&capped)
    } else {
        capped
    }
}

/// Replace anomalous spikes with the series median.
///
/// The threshold is `max(3 × median, 600)`; values at or below it pass
/// through unchanged.
fn cap_spikes(actual: &[ActualPoint]) -> Vec<TrainingPoint> {
    let mut values: Vec<f64> = actual.iter().map(|p| p.value).collect();
    let median = median_mut(&mut values).unwrap_or(0.0);
    let threshold = (CAP_MEDIAN_MULTIPLE * median).max(CAP_FLOOR);

    actual
        .iter()
        .map(|p| TrainingPoint {
            date: p.date,
            value: if p.value > threshold { median } else { p.value },
        })
        .collect()
}

/// Centered moving average over `SMOOTH_WINDOW` points.
///
/// Boundary months average over the neighbors that exist rather than being
/// dropped, so the output length always equals the input length.
fn smooth(points: &[TrainingPoint]) -> Vec<TrainingPoint> {
    let n = points.len();
    let half = SMOOTH_WINDOW / 2;

    points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let lo = i.saturating_sub(half);
            let hi = (i + half).min(n - 1);
            let window = &points[lo..=hi];
            let mean = window.iter().map(|q| q.value).sum::<f64>() / window.len() as f64;
            TrainingPoint {
                date: p.date,
                value: mean,
            }
        })
        .collect()
}

fn median_mut(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        Some((values[mid - 1] + values[mid]) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(values: &[f64]) -> Vec<ActualPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| ActualPoint {
                date: NaiveDate::from_ymd_opt(2024, 1, 1)
                    .unwrap()
                    .checked_add_months(chrono::Months::new(i as u32))
                    .unwrap(),
                value,
            })
            .collect()
    }

    #[test]
    fn spike_above_threshold_is_replaced_by_median() {
        // median = 200, threshold = max(600, 600) = 600; 5000 is capped.
        let actual = series(&[200.0, 200.0, 200.0, 5000.0, 200.0, 200.0]);
        let capped = cap_spikes(&actual);
        assert!((capped[3].value - 200.0).abs() < 1e-12);
        assert!((capped[0].value - 200.0).abs() < 1e-12);
    }

    #[test]
    fn threshold_floor_spares_small_ledgers() {
        // median = 100 so 3×median = 300, but the 600 floor protects the 550.
        let actual = series(&[100.0, 100.0, 550.0]);
        let capped = cap_spikes(&actual);
        assert!((capped[2].value - 550.0).abs() < 1e-12);
    }

    #[test]
    fn capped_values_never_exceed_threshold() {
        let actual = series(&[120.0, 90.0, 4000.0, 110.0, 95.0, 130.0, 7000.0]);
        let mut values: Vec<f64> = actual.iter().map(|p| p.value).collect();
        let median = median_mut(&mut values).unwrap();
        let threshold = (3.0 * median).max(600.0);
        for p in cap_spikes(&actual) {
            assert!(p.value <= threshold);
        }
    }

    #[test]
    fn short_series_skips_smoothing() {
        let actual = series(&[100.0, 110.0, 105.0, 95.0]);
        let training = condition(&actual);
        assert_eq!(training.len(), 4);
        // Values pass through the cap untouched and no averaging happened.
        assert!((training[0].value - 100.0).abs() < 1e-12);
        assert!((training[3].value - 95.0).abs() < 1e-12);
    }

    #[test]
    fn smoothing_narrows_at_boundaries() {
        let actual = series(&[100.0, 200.0, 100.0, 200.0, 100.0]);
        let training = condition(&actual);
        assert_eq!(training.len(), 5);
        // First point averages over 2 values, interior points over 3.
        assert!((training[0].value - 150.0).abs() < 1e-12);
        assert!((training[1].value - (400.0 / 3.0)).abs() < 1e-9);
        assert!((training[4].value - 150.0).abs() < 1e-12);
    }

    #[test]
    fn length_is_always_preserved() {
        for n in 1..12 {
            let values: Vec<f64> = (0..n).map(|i| 100.0 + i as f64).collect();
            let actual = series(&values);
            assert_eq!(condition(&actual).len(), n);
        }
    }

    #[test]
    fn capping_runs_before_smoothing() {
        // With the spike capped to the median (200), every smoothed value stays
        // near 200 instead of being dragged up by 5000.
        let actual = series(&[200.0, 200.0, 5000.0, 200.0, 200.0, 200.0]);
        let training = condition(&actual);
        for p in &training {
            assert!((p.value - 200.0).abs() < 1e-9, "got {}", p.value);
        }
    }
}
