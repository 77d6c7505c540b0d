//! Read/write fitted-distribution JSON files.
//!
//! Fitted JSON is the "portable" representation of a calibrated baseline:
//! family name, parameter estimates, standard errors, and the log-likelihood.
//! A saved fit can be re-used for sampling later (e.g. a scenario sweep over
//! shifts) without re-fitting.

use std::fs::File;
use std::path::Path;

use crate::domain::FittedDistribution;
use crate::error::{SimError, SimResult};

/// Write a fitted distribution as pretty JSON.
pub fn write_fitted_json(path: &Path, fitted: &FittedDistribution) -> SimResult<()> {
    let file = File::create(path).map_err(|e| SimError::Io {
        context: format!("Failed to create fit JSON '{}': {e}", path.display()),
    })?;

    serde_json::to_writer_pretty(file, fitted).map_err(|e| SimError::Io {
        context: format!("Failed to write fit JSON '{}': {e}", path.display()),
    })?;
    Ok(())
}

/// Read a fitted distribution back from JSON.
pub fn read_fitted_json(path: &Path) -> SimResult<FittedDistribution> {
    let file = File::open(path).map_err(|e| SimError::Io {
        context: format!("Failed to open fit JSON '{}': {e}", path.display()),
    })?;

    serde_json::from_reader(file).map_err(|e| SimError::Io {
        context: format!("Invalid fit JSON '{}': {e}", path.display()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fitted_json_round_trips() {
        let path = std::env::temp_dir().join(format!("envcast_fit_{}.json", std::process::id()));
        let fitted = FittedDistribution {
            family: "log-normal".to_string(),
            param_names: vec!["meanlog".to_string(), "sdlog".to_string()],
            params: vec![1.0, 0.2],
            log_likelihood: -12.5,
            std_errors: Some(vec![0.01, 0.007]),
            n: 40,
        };
        write_fitted_json(&path, &fitted).unwrap();
        let back = read_fitted_json(&path).unwrap();
        assert_eq!(back, fitted);
        std::fs::remove_file(path).ok();
    }
}
