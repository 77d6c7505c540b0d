//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - reads input series
//! - runs fitting / sampling / projection / ensembles
//! - prints summaries
//! - writes optional exports

use clap::Parser;

use crate::cli::{Cli, Command, EnsembleArgs, FitArgs, ProjectArgs, SampleArgs, SummarizeArgs};
use crate::dist::{self, family};
use crate::domain::EnsembleConfig;
use crate::downscale;
use crate::error::{SimError, SimResult};
use crate::rng::stream;

pub mod pipeline;

/// Entry point for the `envcast` binary.
pub fn run() -> SimResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Sample(args) => handle_sample(args),
        Command::Project(args) => handle_project(args),
        Command::Ensemble(args) => handle_ensemble(args),
        Command::Summarize(args) => handle_summarize(args),
    }
}

fn handle_fit(args: FitArgs) -> SimResult<()> {
    let (series, fitted) = pipeline::run_fit(&args.input, &args.family, args.tail)?;

    println!("{}", crate::report::format_series_summary(&series));
    print!("{}", crate::report::format_fit_summary(&fitted));

    if let Some(path) = &args.export {
        crate::io::fitted::write_fitted_json(path, &fitted)?;
    }
    Ok(())
}

fn handle_sample(args: SampleArgs) -> SimResult<()> {
    let fitted = match (&args.dist, &args.input) {
        (Some(path), _) => crate::io::fitted::read_fitted_json(path)?,
        (None, Some(input)) => pipeline::run_fit(input, &args.family, args.tail)?.1,
        (None, None) => {
            return Err(SimError::Io {
                context: "either --dist or --input is required".to_string(),
            });
        }
    };
    let family = family::lookup(&fitted.family)?;

    let mut rng = stream(args.seed);
    let sample = dist::sample_shifted(
        family,
        &fitted,
        args.draws,
        args.shift,
        args.scale_mult,
        &mut rng,
    )?;

    print!("{}", crate::report::format_fit_summary(&fitted));
    println!("sample: {} draws (seed {})", sample.len(), args.seed);
    let summary = crate::resample::summarize(&sample, &[0.05, 0.25, 0.5, 0.75, 0.95])?;
    print!("{}", crate::report::format_quantile_summary(&summary));

    if let Some(path) = &args.export {
        crate::io::export::write_sample_csv(path, &sample)?;
    }
    Ok(())
}

fn handle_project(args: ProjectArgs) -> SimResult<()> {
    let local = pipeline::load_series(&args.local, None)?;
    let covariate = pipeline::load_series(&args.covariate, None)?;
    let future = pipeline::load_series(&args.future, None)?;

    let model = downscale::fit(&local, &covariate)?;
    let mut rng = stream(args.seed);
    let trajectory = downscale::project(&model, &future, &mut rng)?;

    println!("{}", crate::report::format_regression_summary(&model));
    for (year, value) in future.years().iter().zip(trajectory.iter()) {
        println!("{year} {value:.4}");
    }

    if let Some(path) = &args.export {
        crate::io::export::write_trajectory_csv(path, future.years(), &trajectory)?;
    }
    Ok(())
}

fn handle_ensemble(args: EnsembleArgs) -> SimResult<()> {
    let config = ensemble_config_from_args(&args);
    let out = pipeline::run_ensemble(&config)?;

    println!(
        "ensemble: {} trajectories x {} years (mode {:?}, seed {})",
        out.matrix.n_trajectories(),
        out.matrix.n_rows(),
        config.mode,
        config.seed
    );
    print!(
        "{}",
        crate::report::format_bands_table(&out.bands, config.low_q, config.high_q)
    );

    if let Some(path) = &config.export_bands {
        crate::io::export::write_bands_csv(path, &out.bands)?;
    }
    if let Some(path) = &config.export_matrix {
        crate::io::export::write_matrix_csv(path, &out.matrix)?;
    }
    Ok(())
}

fn handle_summarize(args: SummarizeArgs) -> SimResult<()> {
    let series = pipeline::load_series(&args.input, args.tail)?;

    let sample = match args.resample {
        Some(draws) => {
            let mut rng = stream(args.seed);
            crate::resample::resample(series.values(), draws, true, &mut rng)?
        }
        None => series.values().to_vec(),
    };

    println!("{}", crate::report::format_series_summary(&series));
    let summary = crate::resample::summarize(&sample, &args.levels)?;
    print!("{}", crate::report::format_quantile_summary(&summary));
    Ok(())
}

pub fn ensemble_config_from_args(args: &EnsembleArgs) -> EnsembleConfig {
    EnsembleConfig {
        mode: args.mode,
        input: args.input.clone(),
        covariate: args.covariate.clone(),
        future: args.future.clone(),
        family: args.family.clone(),
        tail: args.tail,
        horizon: args.horizon,
        n_trajectories: args.trajectories,
        seed: args.seed,
        low_q: args.low,
        high_q: args.high,
        block_len: args.block_len,
        shift: args.shift,
        scale_mult: args.scale_mult,
        export_bands: args.export_bands.clone(),
        export_matrix: args.export_matrix.clone(),
    }
}
