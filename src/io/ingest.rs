//! CSV ingest and validation.
//!
//! Input series are plain `year,value` tables (a header row is tolerated and
//! skipped). The provider of these files is an external collaborator; the
//! core only depends on the (year, value) shape.
//!
//! Design goals:
//! - **Strict schema**: malformed rows fail with line-numbered errors rather
//!   than being silently dropped
//! - **Deterministic behavior** (no hidden reordering; the file's year order
//!   must already be strictly increasing)
//! - **Separation of concerns**: no modeling logic here

use std::path::Path;

use crate::domain::TimeSeries;
use crate::error::{SimError, SimResult};

/// Read a `year,value` CSV into a validated series.
pub fn read_series_csv(path: &Path) -> SimResult<TimeSeries> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(|e| SimError::Io {
            context: format!("Failed to open series CSV '{}': {e}", path.display()),
        })?;

    let mut pairs = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let line = idx + 1;
        let record = record.map_err(|e| SimError::Io {
            context: format!("{}:{line}: {e}", path.display()),
        })?;

        if record.len() < 2 {
            return Err(SimError::Io {
                context: format!(
                    "{}:{line}: expected 'year,value', got {} field(s)",
                    path.display(),
                    record.len()
                ),
            });
        }

        let year_field = &record[0];
        let year: i32 = match year_field.parse() {
            Ok(y) => y,
            // Tolerate a single header row.
            Err(_) if idx == 0 => continue,
            Err(_) => {
                return Err(SimError::Io {
                    context: format!("{}:{line}: invalid year '{year_field}'", path.display()),
                });
            }
        };

        let value_field = &record[1];
        let value: f64 = value_field.parse().map_err(|_| SimError::Io {
            context: format!("{}:{line}: invalid value '{value_field}'", path.display()),
        })?;

        pairs.push((year, value));
    }

    if pairs.is_empty() {
        return Err(SimError::InsufficientData { needed: 1, got: 0 });
    }
    TimeSeries::from_pairs(pairs)
}
