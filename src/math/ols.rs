//! Least squares solver for the decomposition fit.
//!
//! The decomposition model is linear in its coefficients given the fixed
//! seasonal periods and changepoint locations, so fitting reduces to one
//! least-squares solve of the form:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2 + Σ λ_j β_j^2
//! ```
//!
//! The ridge terms arrive as pre-built penalty rows appended to the design
//! matrix (see `forecast::decompose`), so this module only ever sees a plain
//! rectangular system.
//!
//! Implementation choices:
//! - SVD solve, because the design matrix is tall (observations + penalty
//!   rows over a handful of columns) and monthly series can make the trend
//!   and low-frequency seasonal columns nearly collinear.
//! - Progressively looser tolerances before giving up, so a borderline
//!   conditioning problem degrades into the caller's fallback path instead
//!   of a panic.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly or
/// the solution contains non-finite coefficients.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn penalty_rows_shrink_a_redundant_column() {
        // Two identical columns are unidentifiable without the ridge row on
        // the second one; with it, the solve succeeds and stays finite.
        let x = DMatrix::from_row_slice(
            4,
            2,
            &[
                1.0, 1.0, //
                2.0, 2.0, //
                3.0, 3.0, //
                0.0, 10.0, // penalty row: sqrt(λ) on the second column
            ],
        );
        let y = DVector::from_row_slice(&[1.0, 2.0, 3.0, 0.0]);
        let beta = solve_least_squares(&x, &y).unwrap();
        assert!(beta.iter().all(|v| v.is_finite()));
        // The penalized coefficient is pushed toward zero.
        assert!(beta[1].abs() < beta[0].abs());
    }
}
