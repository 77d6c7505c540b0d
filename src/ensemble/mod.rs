//! Ensemble simulation: repeat a single-trajectory projector N times and
//! summarize the spread.
//!
//! The N draws are embarrassingly parallel: every trajectory consumes only
//! immutable inputs plus its own RNG substream, so columns are evaluated with
//! rayon and collected in index order. Substreams are derived from
//! `(seed, column index)`, which makes results identical under any worker
//! count.

use rayon::prelude::*;

use rand::rngs::StdRng;

use crate::domain::{ProjectionMatrix, QuantileBand};
use crate::error::{SimError, SimResult};
use crate::math::quantile::{check_level, quantile_sorted};
use crate::rng::substream;

/// Run `projector` once per trajectory and collect the results.
///
/// `projector` must return one value per entry of `years`; anything else is a
/// contract violation surfaced as `LengthMismatch`. Fails with
/// `EmptyEnsemble` when `n < 1`.
pub fn run<F>(years: &[i32], n: usize, seed: u64, projector: F) -> SimResult<ProjectionMatrix>
where
    F: Fn(&mut StdRng) -> SimResult<Vec<f64>> + Sync,
{
    if n < 1 {
        return Err(SimError::EmptyEnsemble { n });
    }

    let columns: Vec<Vec<f64>> = (0..n)
        .into_par_iter()
        .map(|column| {
            let mut rng = substream(seed, column as u64);
            let trajectory = projector(&mut rng)?;
            if trajectory.len() != years.len() {
                return Err(SimError::LengthMismatch {
                    expected: years.len(),
                    got: trajectory.len(),
                });
            }
            Ok(trajectory)
        })
        .collect::<SimResult<Vec<_>>>()?;

    Ok(ProjectionMatrix {
        years: years.to_vec(),
        columns,
    })
}

/// Pointwise quantile bands of a projection matrix.
///
/// For each row (time point) the three requested quantiles are computed
/// across columns. Rows are summarized independently; nothing about the
/// band's shape over time is implied. The levels must be an ordered triple in
/// [0, 1].
pub fn quantile_bands(
    matrix: &ProjectionMatrix,
    low: f64,
    mid: f64,
    high: f64,
) -> SimResult<Vec<QuantileBand>> {
    for level in [low, mid, high] {
        check_level(level)?;
    }
    if low > mid {
        return Err(SimError::InvalidQuantile { level: low });
    }
    if mid > high {
        return Err(SimError::InvalidQuantile { level: high });
    }
    if matrix.n_trajectories() == 0 {
        return Err(SimError::EmptyEnsemble { n: 0 });
    }

    let mut bands = Vec::with_capacity(matrix.n_rows());
    for (idx, &year) in matrix.years.iter().enumerate() {
        let mut row = matrix.row(idx);
        row.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        bands.push(QuantileBand {
            year,
            lower: quantile_sorted(&row, low)?,
            median: quantile_sorted(&row, mid)?,
            upper: quantile_sorted(&row, high)?,
        });
    }
    Ok(bands)
}
