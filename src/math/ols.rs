//! Straight-line least squares solver.
//!
//! The downscaling model is `local = a + b * covariate`: a two-column design
//! matrix with one row per overlapping year, solved once per fit.
//!
//! Implementation choices:
//! - We use SVD to solve the least-squares problem robustly even when the
//!   design matrix is tall (more rows than columns).
//!   (Nalgebra's `QR::solve` is intended for square systems and will panic
//!   for non-square matrices.)
//! - The parameter dimension is two, so SVD performance is irrelevant.

use nalgebra::{DMatrix, DVector};

/// Fit `y = a + b * x` by least squares, returning `(a, b)`.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly;
/// callers decide whether that is a singular fit or a numeric failure.
pub fn fit_line(x: &[f64], y: &[f64]) -> Option<(f64, f64)> {
    let n = x.len();
    let mut design = DMatrix::<f64>::zeros(n, 2);
    for (i, &xi) in x.iter().enumerate() {
        design[(i, 0)] = 1.0;
        design[(i, 1)] = xi;
    }
    let rhs = DVector::from_column_slice(y);

    let svd = design.svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(&rhs, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some((beta[0], beta[1]));
            }
        }
    }

    None
}
