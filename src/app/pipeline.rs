//! Shared pipeline logic used by the CLI handlers.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! ingest -> window -> {resample | fit+sample | downscale} -> ensemble -> bands
//!
//! The handlers in `app` then focus on presentation and exports.

use std::path::Path;

use crate::dist::{self, family};
use crate::domain::{EnsembleConfig, EnsembleMode, FittedDistribution, ProjectionMatrix, QuantileBand, TimeSeries};
use crate::downscale;
use crate::ensemble;
use crate::error::{SimError, SimResult};
use crate::io::ingest::read_series_csv;
use crate::resample::{resample, resample_blocks, resample_quantile};

/// All computed outputs of one ensemble run.
#[derive(Debug, Clone)]
pub struct EnsembleOutput {
    pub matrix: ProjectionMatrix,
    pub bands: Vec<QuantileBand>,
}

/// Read a series CSV and optionally restrict it to its last `k` years.
pub fn load_series(path: &Path, tail: Option<usize>) -> SimResult<TimeSeries> {
    let series = read_series_csv(path)?;
    match tail {
        Some(k) => series.tail(k),
        None => Ok(series),
    }
}

/// Ingest + window + fit, shared by `fit` and the parametric modes.
pub fn run_fit(
    input: &Path,
    family_name: &str,
    tail: Option<usize>,
) -> SimResult<(TimeSeries, FittedDistribution)> {
    let series = load_series(input, tail)?;
    let family = family::lookup(family_name)?;
    let fitted = dist::fit(series.values(), family)?;
    Ok((series, fitted))
}

/// Execute a full ensemble run and summarize it into quantile bands.
pub fn run_ensemble(config: &EnsembleConfig) -> SimResult<EnsembleOutput> {
    let series = load_series(&config.input, config.tail)?;
    let matrix = build_matrix(config, &series)?;
    let bands = ensemble::quantile_bands(&matrix, config.low_q, 0.5, config.high_q)?;
    Ok(EnsembleOutput { matrix, bands })
}

fn build_matrix(config: &EnsembleConfig, series: &TimeSeries) -> SimResult<ProjectionMatrix> {
    let n = config.n_trajectories;
    let seed = config.seed;

    match config.mode {
        EnsembleMode::Empirical => {
            let years = horizon_years(series, config.horizon)?;
            let values = series.values().to_vec();
            let horizon = config.horizon;
            ensemble::run(&years, n, seed, move |rng| resample(&values, horizon, true, rng))
        }
        EnsembleMode::Block => {
            let years = horizon_years(series, config.horizon)?;
            let values = series.values().to_vec();
            let horizon = config.horizon;
            let block_len = config.block_len;
            ensemble::run(&years, n, seed, move |rng| {
                resample_blocks(&values, horizon, block_len, rng)
            })
        }
        EnsembleMode::Quantile => {
            let years = horizon_years(series, config.horizon)?;
            let values = series.values().to_vec();
            let horizon = config.horizon;
            ensemble::run(&years, n, seed, move |rng| {
                resample_quantile(&values, horizon, rng)
            })
        }
        EnsembleMode::Parametric => {
            let years = horizon_years(series, config.horizon)?;
            let family = family::lookup(config.family.as_deref().unwrap_or("log-normal"))?;
            let fitted = dist::fit(series.values(), family)?;
            let horizon = config.horizon;
            let (shift, scale_mult) = (config.shift, config.scale_mult);
            ensemble::run(&years, n, seed, move |rng| {
                dist::sample_shifted(family, &fitted, horizon, shift, scale_mult, rng)
            })
        }
        EnsembleMode::Downscale => {
            let covariate_path = config.covariate.as_ref().ok_or_else(|| SimError::Io {
                context: "--covariate is required for downscale mode".to_string(),
            })?;
            let future_path = config.future.as_ref().ok_or_else(|| SimError::Io {
                context: "--future is required for downscale mode".to_string(),
            })?;

            let covariate = load_series(covariate_path, None)?;
            let future = load_series(future_path, None)?;
            let model = downscale::fit(series, &covariate)?;

            let years = future.years().to_vec();
            ensemble::run(&years, n, seed, move |rng| downscale::project(&model, &future, rng))
        }
    }
}

/// Time index for horizon-based modes: the years immediately after the
/// observed record.
fn horizon_years(series: &TimeSeries, horizon: usize) -> SimResult<Vec<i32>> {
    if horizon == 0 {
        return Err(SimError::InsufficientData { needed: 1, got: 0 });
    }
    let last = series.last_year().ok_or(SimError::InsufficientData { needed: 1, got: 0 })?;
    Ok((1..=horizon as i32).map(|i| last + i).collect())
}
