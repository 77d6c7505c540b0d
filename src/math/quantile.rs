//! Linear-interpolation quantile estimator.
//!
//! The same estimator is used everywhere a quantile is needed (sample
//! summaries and ensemble bands), so the two surfaces can never disagree on
//! convention. It matches the common "type 7" definition: for level `q` and a
//! sorted sample of size `n`, interpolate linearly between the order
//! statistics bracketing rank `q * (n - 1)`.

use crate::error::{SimError, SimResult};

/// Validate a quantile level.
pub fn check_level(level: f64) -> SimResult<()> {
    if !(level.is_finite() && (0.0..=1.0).contains(&level)) {
        return Err(SimError::InvalidQuantile { level });
    }
    Ok(())
}

/// Quantile of an **already sorted** sample.
///
/// Callers that need several levels from one sample should sort once and call
/// this repeatedly.
pub fn quantile_sorted(sorted: &[f64], level: f64) -> SimResult<f64> {
    check_level(level)?;
    if sorted.is_empty() {
        return Err(SimError::InsufficientData { needed: 1, got: 0 });
    }

    let n = sorted.len();
    let rank = level * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let frac = rank - lo as f64;

    if lo + 1 >= n {
        return Ok(sorted[n - 1]);
    }
    Ok(sorted[lo] + frac * (sorted[lo + 1] - sorted[lo]))
}

/// Quantile of an unsorted sample (sorts a copy).
pub fn quantile(sample: &[f64], level: f64) -> SimResult<f64> {
    let mut sorted = sample.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    quantile_sorted(&sorted, level)
}
