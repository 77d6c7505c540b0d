//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting and simulation
//! - exported to JSON/CSV
//! - reloaded later for comparisons or downstream population models

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// An observed environmental series, keyed by calendar year.
///
/// Invariants enforced at construction:
/// - years strictly increasing (no duplicates)
/// - one value per year
/// - all values finite (missing entries must be dropped or imputed upstream)
///
/// The series is owned by the caller; every pipeline stage consumes it
/// immutably and produces new values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    years: Vec<i32>,
    values: Vec<f64>,
}

impl TimeSeries {
    pub fn new(years: Vec<i32>, values: Vec<f64>) -> SimResult<Self> {
        if years.len() != values.len() {
            return Err(SimError::LengthMismatch {
                expected: years.len(),
                got: values.len(),
            });
        }
        for w in years.windows(2) {
            if w[1] <= w[0] {
                return Err(SimError::UnorderedYears { year: w[1] });
            }
        }
        for (&year, &value) in years.iter().zip(values.iter()) {
            if !value.is_finite() {
                return Err(SimError::NonFiniteValue { year });
            }
        }
        Ok(Self { years, values })
    }

    pub fn from_pairs(pairs: Vec<(i32, f64)>) -> SimResult<Self> {
        let (years, values) = pairs.into_iter().unzip();
        Self::new(years, values)
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn last_year(&self) -> Option<i32> {
        self.years.last().copied()
    }

    /// The last `k` (year, value) pairs in original order.
    ///
    /// This is the standard way to restrict projections to a recent climate
    /// window (e.g. the last 30 years of a century-long record).
    pub fn tail(&self, k: usize) -> SimResult<TimeSeries> {
        if k == 0 || k > self.len() {
            return Err(SimError::InsufficientData {
                needed: k.max(1),
                got: self.len(),
            });
        }
        let start = self.len() - k;
        Ok(TimeSeries {
            years: self.years[start..].to_vec(),
            values: self.values[start..].to_vec(),
        })
    }

    /// Inner-join two series on year.
    ///
    /// Returns `(years, self values, other values)` for the overlapping years
    /// only. Both inputs are strictly increasing, so a single merge pass
    /// suffices.
    pub fn inner_join(&self, other: &TimeSeries) -> (Vec<i32>, Vec<f64>, Vec<f64>) {
        let mut years = Vec::new();
        let mut left = Vec::new();
        let mut right = Vec::new();

        let (mut i, mut j) = (0usize, 0usize);
        while i < self.len() && j < other.len() {
            match self.years[i].cmp(&other.years[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    years.push(self.years[i]);
                    left.push(self.values[i]);
                    right.push(other.values[j]);
                    i += 1;
                    j += 1;
                }
            }
        }
        (years, left, right)
    }
}

/// A parametric distribution fitted by maximum likelihood.
///
/// Immutable once created; produced only by `dist::fit`. `std_errors` is
/// `None` when the observed information matrix is not invertible at the
/// optimum (e.g. a boundary fit), never silently zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedDistribution {
    pub family: String,
    pub param_names: Vec<String>,
    pub params: Vec<f64>,
    pub log_likelihood: f64,
    pub std_errors: Option<Vec<f64>>,
    /// Number of observations the fit used.
    pub n: usize,
}

/// An ordinary linear model `local = intercept + slope * covariate`.
///
/// Immutable; produced only by `downscale::fit`. The residual pool is public
/// so callers can swap in richer noise models than the default
/// draw-with-replacement bootstrap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionModel {
    pub intercept: f64,
    pub slope: f64,
    /// Years of the overlapping observations the fit used.
    pub years: Vec<i32>,
    pub fitted: Vec<f64>,
    /// Observed minus fitted, one per fit row.
    pub residuals: Vec<f64>,
}

impl RegressionModel {
    pub fn predict(&self, covariate: f64) -> f64 {
        self.intercept + self.slope * covariate
    }

    pub fn n(&self) -> usize {
        self.years.len()
    }

    /// Fraction of local variance explained by the covariate.
    pub fn r_squared(&self) -> f64 {
        let n = self.fitted.len() as f64;
        let obs: Vec<f64> = self
            .fitted
            .iter()
            .zip(self.residuals.iter())
            .map(|(f, r)| f + r)
            .collect();
        let mean = obs.iter().sum::<f64>() / n;
        let ss_tot: f64 = obs.iter().map(|y| (y - mean) * (y - mean)).sum();
        let ss_res: f64 = self.residuals.iter().map(|r| r * r).sum();
        if ss_tot <= 0.0 {
            return 0.0;
        }
        1.0 - ss_res / ss_tot
    }
}

/// N independent simulated trajectories over a common time index.
///
/// Rows are time points, columns are trajectories. Every column has exactly
/// one entry per year and `columns.len() >= 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionMatrix {
    pub years: Vec<i32>,
    pub columns: Vec<Vec<f64>>,
}

impl ProjectionMatrix {
    pub fn n_trajectories(&self) -> usize {
        self.columns.len()
    }

    pub fn n_rows(&self) -> usize {
        self.years.len()
    }

    /// Collect row `idx` across all trajectories (one value per column).
    pub fn row(&self, idx: usize) -> Vec<f64> {
        self.columns.iter().map(|c| c[idx]).collect()
    }
}

/// Pointwise quantile summary of a projection matrix at one time point.
///
/// Derived on demand; never cached across mutations of its source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantileBand {
    pub year: i32,
    pub lower: f64,
    pub median: f64,
    pub upper: f64,
}

/// Which projection engine an ensemble run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EnsembleMode {
    /// Bootstrap redraws from the observed values (cannot leave the observed
    /// support).
    Empirical,
    /// Moving-block bootstrap from the observed values.
    Block,
    /// Smoothed bootstrap through the empirical quantile function.
    Quantile,
    /// Draws from a fitted parametric distribution.
    Parametric,
    /// Regression downscaling of a covariate trajectory with residual
    /// bootstrap.
    Downscale,
}

/// A full ensemble run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct EnsembleConfig {
    pub mode: EnsembleMode,
    pub input: PathBuf,
    /// Covariate history (downscale mode only).
    pub covariate: Option<PathBuf>,
    /// Future covariate trajectory (downscale mode only).
    pub future: Option<PathBuf>,
    /// Distribution family (parametric mode only).
    pub family: Option<String>,
    /// Restrict the observed series to its last `k` years before projecting.
    pub tail: Option<usize>,
    /// Projection horizon in years (ignored in downscale mode, where the
    /// future covariate supplies the index).
    pub horizon: usize,
    pub n_trajectories: usize,
    pub seed: u64,
    pub low_q: f64,
    pub high_q: f64,
    /// Block length for block mode.
    pub block_len: usize,
    /// Location shift applied to the fitted distribution (parametric mode).
    pub shift: f64,
    /// Scale multiplier applied to the fitted distribution (parametric mode).
    pub scale_mult: f64,
    pub export_bands: Option<PathBuf>,
    pub export_matrix: Option<PathBuf>,
}
