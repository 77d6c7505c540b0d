//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the observed series type (`TimeSeries`) and its windowing ops
//! - simulation outputs (`ProjectionMatrix`, `QuantileBand`)
//! - fit artifacts (`FittedDistribution`, `RegressionModel`)
//! - run configuration (`EnsembleConfig`)

pub mod types;

pub use types::*;
