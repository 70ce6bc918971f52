//! Trend + seasonality decomposition forecaster.
//!
//! Given the conditioned training series:
//!
//! - time is normalized to `s ∈ [0, 1]` over the observed span and the values
//!   are scaled by their maximum magnitude, so the priors below are unit-free
//! - the trend is piecewise linear: a global slope plus hinge terms at evenly
//!   spaced changepoints over the first 80% of the history, shrunk by a
//!   conservative prior
//! - seasonality is additive: one explicit first-order term with period
//!   ≈ 30.5 days (a mild intra-year billing cycle), plus a yearly block that
//!   activates only once the history spans two full years, shrunk hard by the
//!   low model-level seasonality prior
//! - no daily or weekly components exist at monthly granularity
//!
//! Everything is linear in the coefficients, so the fit is a single
//! ridge-regularized least-squares solve: each prior becomes a synthetic
//! zero-target row with weight `1/σ²` appended to the design matrix, and
//! `math::solve_least_squares` does the rest.
//!
//! Failures here (non-finite inputs, an unsolvable system, non-finite
//! predictions) are reported as `FitError` and converted by the selector into
//! the fallback strategy; they never abort a query.

use chrono::NaiveDate;
use nalgebra::{DMatrix, DVector};

use crate::domain::{ForecastPoint, TrainingPoint};
use crate::math::{changepoint_grid, fourier_pair, hinge, solve_least_squares};

/// Maximum number of trend changepoints.
const MAX_CHANGEPOINTS: usize = 25;

/// Fraction of the history over which changepoints are placed.
const CHANGEPOINT_RANGE: f64 = 0.8;

/// Prior scale for changepoint (trend flexibility) coefficients.
const CHANGEPOINT_PRIOR: f64 = 0.05;

/// Prior scale for the model-level (yearly) seasonal block.
const SEASONAL_PRIOR: f64 = 0.01;

/// The explicit intra-year billing-cycle term.
const MONTHLY_PERIOD_DAYS: f64 = 30.5;
const MONTHLY_PRIOR: f64 = 0.1;

/// Yearly seasonality: period, harmonic count, and the minimum observed span
/// (two full years) before the block is included at all.
const YEARLY_PERIOD_DAYS: f64 = 365.25;
const YEARLY_ORDER: usize = 3;
const YEARLY_MIN_SPAN_DAYS: f64 = 730.0;

/// An internal fit/predict failure. Swallowed by the model selector.
#[derive(Debug, Clone)]
pub struct FitError {
    message: String,
}

impl FitError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for FitError {}

/// A fitted decomposition model, ready to predict over arbitrary month keys.
#[derive(Debug, Clone)]
pub struct FittedDecomposition {
    origin: NaiveDate,
    span_days: f64,
    y_scale: f64,
    changepoints: Vec<f64>,
    yearly: bool,
    betas: Vec<f64>,
}

/// Fit the decomposition model to the training series.
pub fn fit(training: &[TrainingPoint]) -> Result<FittedDecomposition, FitError> {
    let n = training.len();
    if n < 2 {
        return Err(FitError::new("Training series too short to decompose."));
    }
    if training.iter().any(|p| !p.value.is_finite()) {
        return Err(FitError::new("Non-finite value in training series."));
    }

    let origin = training[0].date;
    let t_days: Vec<f64> = training
        .iter()
        .map(|p| (p.date - origin).num_days() as f64)
        .collect();
    let span_days = t_days.last().copied().unwrap_or(0.0).max(1.0);

    let y_scale = training
        .iter()
        .map(|p| p.value.abs())
        .fold(0.0_f64, f64::max)
        .max(1e-12);

    let changepoints = changepoint_grid(MAX_CHANGEPOINTS.min(n - 2), CHANGEPOINT_RANGE);
    let yearly = span_days >= YEARLY_MIN_SPAN_DAYS;

    let n_cols = column_count(&changepoints, yearly);
    let n_penalized = n_cols - 2; // everything except intercept and slope
    let mut x = DMatrix::<f64>::zeros(n + n_penalized, n_cols);
    let mut y = DVector::<f64>::zeros(n + n_penalized);
    let mut row = vec![0.0; n_cols];

    for (i, point) in training.iter().enumerate() {
        fill_design_row(t_days[i], t_days[i] / span_days, &changepoints, yearly, &mut row);
        for (j, &v) in row.iter().enumerate() {
            x[(i, j)] = v;
        }
        y[i] = point.value / y_scale;
    }

    // Priors as synthetic observations: a zero-target row with weight 1/σ²
    // (so entry √λ = 1/σ) per penalized column.
    for (k, j) in (2..n_cols).enumerate() {
        let sigma = column_prior(j, &changepoints, yearly);
        x[(n + k, j)] = 1.0 / sigma;
        // y stays 0.
    }

    let betas = solve_least_squares(&x, &y)
        .ok_or_else(|| FitError::new("Decomposition system too ill-conditioned to solve."))?;

    Ok(FittedDecomposition {
        origin,
        span_days,
        y_scale,
        changepoints,
        yearly,
        betas: betas.iter().copied().collect(),
    })
}

impl FittedDecomposition {
    /// Predict one point per requested month key.
    ///
    /// Dates may lie anywhere: history dates reproduce the fitted curve,
    /// future dates extrapolate the trend past `s = 1` with the hinge slopes
    /// carried forward.
    pub fn predict(&self, dates: &[NaiveDate]) -> Result<Vec<ForecastPoint>, FitError> {
        let n_cols = column_count(&self.changepoints, self.yearly);
        let mut row = vec![0.0; n_cols];
        let mut out = Vec::with_capacity(dates.len());

        for &date in dates {
            let t = (date - self.origin).num_days() as f64;
            let s = t / self.span_days;
            fill_design_row(t, s, &self.changepoints, self.yearly, &mut row);

            let yhat_scaled: f64 = row.iter().zip(&self.betas).map(|(a, b)| a * b).sum();
            let trend_scaled = self.trend_scaled(s);

            let predicted = yhat_scaled * self.y_scale;
            let trend = trend_scaled * self.y_scale;
            if !(predicted.is_finite() && trend.is_finite()) {
                return Err(FitError::new("Non-finite decomposition prediction."));
            }

            out.push(ForecastPoint {
                date,
                predicted,
                trend: Some(trend),
            });
        }

        Ok(out)
    }

    /// The trend component alone, on normalized time.
    fn trend_scaled(&self, s: f64) -> f64 {
        let mut trend = self.betas[0] + self.betas[1] * s;
        for (j, &c) in self.changepoints.iter().enumerate() {
            trend += self.betas[2 + j] * hinge(s, c);
        }
        trend
    }
}

fn column_count(changepoints: &[f64], yearly: bool) -> usize {
    // intercept + slope + hinges + monthly pair + optional yearly pairs
    2 + changepoints.len() + 2 + if yearly { 2 * YEARLY_ORDER } else { 0 }
}

/// Prior scale for a penalized design column.
fn column_prior(col: usize, changepoints: &[f64], yearly: bool) -> f64 {
    let hinge_end = 2 + changepoints.len();
    let monthly_end = hinge_end + 2;
    if col < hinge_end {
        CHANGEPOINT_PRIOR
    } else if col < monthly_end {
        MONTHLY_PRIOR
    } else {
        debug_assert!(yearly);
        SEASONAL_PRIOR
    }
}

fn fill_design_row(t_days: f64, s: f64, changepoints: &[f64], yearly: bool, out: &mut [f64]) {
    out[0] = 1.0;
    out[1] = s;
    let mut j = 2;
    for &c in changepoints {
        out[j] = hinge(s, c);
        j += 1;
    }
    let (mc, ms) = fourier_pair(t_days, MONTHLY_PERIOD_DAYS, 1);
    out[j] = mc;
    out[j + 1] = ms;
    j += 2;
    if yearly {
        for k in 1..=YEARLY_ORDER {
            let (c, sn) = fourier_pair(t_days, YEARLY_PERIOD_DAYS, k);
            out[j] = c;
            out[j + 1] = sn;
            j += 2;
        }
    }
}
