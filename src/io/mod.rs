//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - band/matrix/sample exports (CSV) (`export`)
//! - fitted-distribution JSON read/write (`fitted`)

pub mod export;
pub mod fitted;
pub mod ingest;

pub use export::*;
pub use fitted::*;
pub use ingest::*;
