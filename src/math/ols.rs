//! Least squares solver.
//!
//! The forecaster fits a small linear regression of the form:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! where each row holds an intercept, a time trend, and seasonal terms.
//!
//! Implementation choices:
//! - We use SVD so tall (more rows than columns) and rank-deficient designs
//!   are both handled. Nalgebra's `QR::solve` is intended for square systems
//!   and will panic for non-square matrices.
//! - Parameter dimension is tiny (at most 8 columns), so SVD cost is negligible.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    if x.nrows() == 0 || x.nrows() != y.len() {
        return None;
    }
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}
