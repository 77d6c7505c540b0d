//! Command-line parsing for the projection toolkit.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the modeling/math code. Each subcommand maps 1:1
//! onto a core operation: `fit`, `sample`, `project`, `ensemble`,
//! `summarize`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::EnsembleMode;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "envcast", version, about = "Environmental series projection toolkit")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit a parametric distribution to an observed series by maximum
    /// likelihood.
    Fit(FitArgs),
    /// Draw samples from a fitted distribution, optionally shifted.
    Sample(SampleArgs),
    /// Project a single downscaled trajectory along a future covariate.
    Project(ProjectArgs),
    /// Run a projection ensemble and print pointwise quantile bands.
    Ensemble(EnsembleArgs),
    /// Print a quantile summary of an observed series.
    Summarize(SummarizeArgs),
}

/// Options for `envcast fit`.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Observed series CSV (`year,value`).
    pub input: PathBuf,

    /// Distribution family (log-normal, weibull, gumbel).
    #[arg(short = 'f', long, default_value = "log-normal")]
    pub family: String,

    /// Use only the last K observations.
    #[arg(long)]
    pub tail: Option<usize>,

    /// Export the fitted distribution as JSON.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// Options for `envcast sample`.
#[derive(Debug, Parser, Clone)]
pub struct SampleArgs {
    /// Previously exported fit JSON (alternative to --input).
    #[arg(long, conflicts_with = "input")]
    pub dist: Option<PathBuf>,

    /// Observed series CSV to fit inline (alternative to --dist).
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Distribution family for an inline fit.
    #[arg(short = 'f', long, default_value = "log-normal")]
    pub family: String,

    /// Use only the last K observations for an inline fit.
    #[arg(long)]
    pub tail: Option<usize>,

    /// Number of draws.
    #[arg(short = 'n', long, default_value_t = 1000)]
    pub draws: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Location shift applied in the family's natural parameter space.
    #[arg(long, default_value_t = 0.0)]
    pub shift: f64,

    /// Scale multiplier applied in the family's natural parameter space.
    #[arg(long, default_value_t = 1.0)]
    pub scale_mult: f64,

    /// Export the drawn sample to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// Options for `envcast project`.
#[derive(Debug, Parser, Clone)]
pub struct ProjectArgs {
    /// Local observed series CSV (`year,value`).
    #[arg(long)]
    pub local: PathBuf,

    /// Covariate history CSV, inner-joined with the local series on year.
    #[arg(long)]
    pub covariate: PathBuf,

    /// Future covariate trajectory CSV.
    #[arg(long)]
    pub future: PathBuf,

    /// Random seed for the residual bootstrap.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Export the projected trajectory to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// Options for `envcast ensemble`.
#[derive(Debug, Parser, Clone)]
pub struct EnsembleArgs {
    /// Projection engine to repeat.
    #[arg(short = 'm', long, value_enum, default_value_t = EnsembleMode::Empirical)]
    pub mode: EnsembleMode,

    /// Observed series CSV (`year,value`).
    pub input: PathBuf,

    /// Covariate history CSV (downscale mode).
    #[arg(long)]
    pub covariate: Option<PathBuf>,

    /// Future covariate trajectory CSV (downscale mode).
    #[arg(long)]
    pub future: Option<PathBuf>,

    /// Distribution family (parametric mode).
    #[arg(short = 'f', long)]
    pub family: Option<String>,

    /// Use only the last K observations.
    #[arg(long)]
    pub tail: Option<usize>,

    /// Projection horizon in years (ignored in downscale mode).
    #[arg(long, default_value_t = 10)]
    pub horizon: usize,

    /// Number of independent trajectories.
    #[arg(short = 'n', long, default_value_t = 500)]
    pub trajectories: usize,

    /// Random seed; trajectory i uses substream (seed, i).
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Lower band quantile.
    #[arg(long, default_value_t = 0.05)]
    pub low: f64,

    /// Upper band quantile.
    #[arg(long, default_value_t = 0.95)]
    pub high: f64,

    /// Block length (block mode).
    #[arg(long, default_value_t = 3)]
    pub block_len: usize,

    /// Location shift applied to the fitted distribution (parametric mode).
    #[arg(long, default_value_t = 0.0)]
    pub shift: f64,

    /// Scale multiplier applied to the fitted distribution (parametric mode).
    #[arg(long, default_value_t = 1.0)]
    pub scale_mult: f64,

    /// Export the band table to CSV.
    #[arg(long = "export-bands")]
    pub export_bands: Option<PathBuf>,

    /// Export the full projection matrix to CSV.
    #[arg(long = "export-matrix")]
    pub export_matrix: Option<PathBuf>,
}

/// Options for `envcast summarize`.
#[derive(Debug, Parser, Clone)]
pub struct SummarizeArgs {
    /// Observed series CSV (`year,value`).
    pub input: PathBuf,

    /// Use only the last K observations.
    #[arg(long)]
    pub tail: Option<usize>,

    /// Quantile levels to report.
    #[arg(long, value_delimiter = ',', default_values_t = [0.05, 0.25, 0.5, 0.75, 0.95])]
    pub levels: Vec<f64>,

    /// Bootstrap the series to this many draws before summarizing.
    #[arg(long)]
    pub resample: Option<usize>,

    /// Random seed for --resample.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}
