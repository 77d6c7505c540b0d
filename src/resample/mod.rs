//! Empirical (non-parametric) resampling.
//!
//! Bootstrap redraws from the observed values, plus a moving-block variant
//! that preserves short-range autocorrelation, and quantile summaries of the
//! resulting samples.
//!
//! Empirical resampling is intentionally constrained to the observed value
//! support: it cannot produce values beyond the historical extremes. That is
//! a documented limitation of the method, not something to widen with noise.

use rand::Rng;
use rand::rngs::StdRng;

use crate::error::{SimError, SimResult};
use crate::math::quantile::{check_level, quantile_sorted};

/// Draw `sample_size` values uniformly at random from `values`.
///
/// With replacement the draws are independent; without replacement the result
/// is a uniform random subset in draw order (partial Fisher-Yates), and
/// `sample_size` must not exceed the population.
pub fn resample(
    values: &[f64],
    sample_size: usize,
    with_replacement: bool,
    rng: &mut StdRng,
) -> SimResult<Vec<f64>> {
    if values.is_empty() {
        return Err(SimError::InsufficientData { needed: 1, got: 0 });
    }

    if with_replacement {
        let mut out = Vec::with_capacity(sample_size);
        for _ in 0..sample_size {
            out.push(values[rng.gen_range(0..values.len())]);
        }
        return Ok(out);
    }

    if sample_size > values.len() {
        return Err(SimError::SampleSize {
            requested: sample_size,
            available: values.len(),
        });
    }

    let mut pool = values.to_vec();
    let mut out = Vec::with_capacity(sample_size);
    for i in 0..sample_size {
        let j = rng.gen_range(i..pool.len());
        pool.swap(i, j);
        out.push(pool[i]);
    }
    Ok(out)
}

/// Moving-block bootstrap: concatenate uniformly chosen contiguous blocks of
/// `block_len` observations, truncated to `sample_size`.
///
/// Useful when the series has short-range autocorrelation that independent
/// redraws would destroy. `block_len` must lie in `[1, len]`.
pub fn resample_blocks(
    values: &[f64],
    sample_size: usize,
    block_len: usize,
    rng: &mut StdRng,
) -> SimResult<Vec<f64>> {
    if values.is_empty() {
        return Err(SimError::InsufficientData { needed: 1, got: 0 });
    }
    if block_len == 0 || block_len > values.len() {
        return Err(SimError::SampleSize {
            requested: block_len,
            available: values.len(),
        });
    }

    let n_starts = values.len() - block_len + 1;
    let mut out = Vec::with_capacity(sample_size + block_len);
    while out.len() < sample_size {
        let start = rng.gen_range(0..n_starts);
        out.extend_from_slice(&values[start..start + block_len]);
    }
    out.truncate(sample_size);
    Ok(out)
}

/// Smoothed bootstrap through the empirical quantile function.
///
/// Each draw maps a uniform level through the linear-interpolation quantile
/// estimator, so draws can fall between observed values but never outside the
/// observed extremes.
pub fn resample_quantile(
    values: &[f64],
    sample_size: usize,
    rng: &mut StdRng,
) -> SimResult<Vec<f64>> {
    if values.is_empty() {
        return Err(SimError::InsufficientData { needed: 1, got: 0 });
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut out = Vec::with_capacity(sample_size);
    for _ in 0..sample_size {
        let level = rng.gen_range(0.0..=1.0);
        out.push(quantile_sorted(&sorted, level)?);
    }
    Ok(out)
}

/// Quantile summary of a sample at the requested levels.
///
/// Returns `(level, value)` pairs in the order requested. Levels must lie in
/// [0, 1]; the sample is sorted once and shared across levels.
pub fn summarize(sample: &[f64], levels: &[f64]) -> SimResult<Vec<(f64, f64)>> {
    if sample.is_empty() {
        return Err(SimError::InsufficientData { needed: 1, got: 0 });
    }
    for &level in levels {
        check_level(level)?;
    }

    let mut sorted = sample.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    levels
        .iter()
        .map(|&level| quantile_sorted(&sorted, level).map(|v| (level, v)))
        .collect()
}

/// Look up one level in a `summarize` result.
pub fn summary_level(summary: &[(f64, f64)], level: f64) -> Option<f64> {
    summary.iter().find(|(l, _)| *l == level).map(|(_, v)| *v)
}
