//! Export simulation outputs to CSV.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream
//! population-model scripts: plain row-oriented tables, one row per year.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{ProjectionMatrix, QuantileBand};
use crate::error::{SimError, SimResult};

/// Write a quantile band table (`year,lower,median,upper`).
pub fn write_bands_csv(path: &Path, bands: &[QuantileBand]) -> SimResult<()> {
    let mut file = create(path)?;

    writeln!(file, "year,lower,median,upper")
        .map_err(|e| write_err(path, e))?;
    for band in bands {
        writeln!(
            file,
            "{},{:.10},{:.10},{:.10}",
            band.year, band.lower, band.median, band.upper
        )
        .map_err(|e| write_err(path, e))?;
    }
    Ok(())
}

/// Write a full projection matrix (`year,t1,t2,...`), one column per
/// trajectory.
pub fn write_matrix_csv(path: &Path, matrix: &ProjectionMatrix) -> SimResult<()> {
    let mut file = create(path)?;

    let header: Vec<String> = (1..=matrix.n_trajectories()).map(|i| format!("t{i}")).collect();
    writeln!(file, "year,{}", header.join(",")).map_err(|e| write_err(path, e))?;

    for (idx, &year) in matrix.years.iter().enumerate() {
        let row: Vec<String> = matrix
            .columns
            .iter()
            .map(|c| format!("{:.10}", c[idx]))
            .collect();
        writeln!(file, "{year},{}", row.join(",")).map_err(|e| write_err(path, e))?;
    }
    Ok(())
}

/// Write a single trajectory (`year,value`).
pub fn write_trajectory_csv(path: &Path, years: &[i32], values: &[f64]) -> SimResult<()> {
    let mut file = create(path)?;

    writeln!(file, "year,value").map_err(|e| write_err(path, e))?;
    for (year, value) in years.iter().zip(values.iter()) {
        writeln!(file, "{year},{value:.10}").map_err(|e| write_err(path, e))?;
    }
    Ok(())
}

/// Write a flat sample (`value`, one per line).
pub fn write_sample_csv(path: &Path, sample: &[f64]) -> SimResult<()> {
    let mut file = create(path)?;

    writeln!(file, "value").map_err(|e| write_err(path, e))?;
    for v in sample {
        writeln!(file, "{v:.10}").map_err(|e| write_err(path, e))?;
    }
    Ok(())
}

fn create(path: &Path) -> SimResult<File> {
    File::create(path).map_err(|e| SimError::Io {
        context: format!("Failed to create export CSV '{}': {e}", path.display()),
    })
}

fn write_err(path: &Path, e: std::io::Error) -> SimError {
    SimError::Io {
        context: format!("Failed to write export CSV '{}': {e}", path.display()),
    }
}
