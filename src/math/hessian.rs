//! Numerical Hessian and standard errors from the observed information.
//!
//! The fitter reports parameter uncertainty as the square roots of the
//! diagonal of `J(θ̂)⁻¹`, where `J = -H` is the observed information and `H`
//! the central-difference Hessian of the log-likelihood at the optimum.
//!
//! When `J` is not invertible (boundary fits, weak identification) the
//! standard errors are reported as absent rather than approximated: the point
//! estimates remain valid, the curvature does not.

use nalgebra::DMatrix;

/// Relative step for central differences, scaled per coordinate.
const FD_STEP: f64 = 1e-4;

/// Central-difference Hessian of `f` at `theta`.
///
/// `f` is evaluated `2p² + 1` times for `p` parameters; fine for the small
/// parameter counts of the builtin families.
pub fn central_hessian<F>(f: &F, theta: &[f64]) -> DMatrix<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let p = theta.len();
    let steps: Vec<f64> = theta.iter().map(|t| FD_STEP * t.abs().max(1.0)).collect();
    let mut h = DMatrix::<f64>::zeros(p, p);

    let f0 = f(theta);
    let mut work = theta.to_vec();

    for i in 0..p {
        // Diagonal: (f(+h) - 2 f(0) + f(-h)) / h^2
        work.copy_from_slice(theta);
        work[i] = theta[i] + steps[i];
        let fp = f(&work);
        work[i] = theta[i] - steps[i];
        let fm = f(&work);
        h[(i, i)] = (fp - 2.0 * f0 + fm) / (steps[i] * steps[i]);

        // Off-diagonal: four-point cross difference, symmetrized by
        // construction.
        for j in (i + 1)..p {
            work.copy_from_slice(theta);
            work[i] = theta[i] + steps[i];
            work[j] = theta[j] + steps[j];
            let fpp = f(&work);
            work[j] = theta[j] - steps[j];
            let fpm = f(&work);
            work[i] = theta[i] - steps[i];
            let fmm = f(&work);
            work[j] = theta[j] + steps[j];
            let fmp = f(&work);

            let hij = (fpp - fpm - fmp + fmm) / (4.0 * steps[i] * steps[j]);
            h[(i, j)] = hij;
            h[(j, i)] = hij;
        }
    }

    h
}

/// Standard errors from the observed information `J = -H` at the optimum of
/// a log-likelihood.
///
/// Returns `None` when the information matrix is singular, not finite, or has
/// non-positive variances on its inverse diagonal.
pub fn standard_errors<F>(log_lik: &F, theta: &[f64]) -> Option<Vec<f64>>
where
    F: Fn(&[f64]) -> f64,
{
    let h = central_hessian(log_lik, theta);
    if h.iter().any(|v| !v.is_finite()) {
        return None;
    }

    let info = -h;
    let inv = info.try_inverse()?;

    let mut out = Vec::with_capacity(theta.len());
    for i in 0..theta.len() {
        let var = inv[(i, i)];
        if !(var.is_finite() && var > 0.0) {
            return None;
        }
        out.push(var.sqrt());
    }
    Some(out)
}
