//! Regression-based downscaling of a broad-scale covariate.
//!
//! A local environmental variable is related to an external covariate
//! trajectory (typically a climate-model projection) by an ordinary linear
//! model, then projected forward along supplied future covariate values with
//! one bootstrapped historical residual added per time step.
//!
//! The residual bootstrap propagates the *historical* unexplained variance
//! forward under the assumption that it is stationary. That is a stated
//! modeling assumption, not a guarantee; the residual pool is public on
//! `RegressionModel` so richer noise models can be swapped in.

use rand::Rng;
use rand::rngs::StdRng;

use crate::domain::{RegressionModel, TimeSeries};
use crate::error::{SimError, SimResult};
use crate::math::ols::fit_line;

/// Fit `local = intercept + slope * covariate` over the years both series
/// share.
///
/// The two series are inner-joined on year first. Fails with
/// `InsufficientData` on fewer than 2 overlapping observations and with
/// `SingularFit` when the covariate carries (almost) no variance.
pub fn fit(local: &TimeSeries, covariate: &TimeSeries) -> SimResult<RegressionModel> {
    let (years, y, x) = local.inner_join(covariate);
    let n = years.len();
    if n < 2 {
        return Err(SimError::InsufficientData { needed: 2, got: n });
    }

    let x_mean = x.iter().sum::<f64>() / n as f64;
    let variance = x.iter().map(|v| (v - x_mean) * (v - x_mean)).sum::<f64>() / (n - 1) as f64;
    if variance <= f64::EPSILON * (1.0 + x_mean * x_mean) {
        return Err(SimError::SingularFit { variance });
    }

    let (intercept, slope) = fit_line(&x, &y).ok_or(SimError::SingularFit { variance })?;

    let fitted: Vec<f64> = x.iter().map(|&xi| intercept + slope * xi).collect();
    let residuals: Vec<f64> = y.iter().zip(fitted.iter()).map(|(yi, fi)| yi - fi).collect();

    Ok(RegressionModel {
        intercept,
        slope,
        years,
        fitted,
        residuals,
    })
}

/// Project the local variable along one future covariate trajectory.
///
/// Each time step gets the point prediction plus one residual drawn with
/// replacement from the model's residual pool. Returns one simulated
/// trajectory aligned to `future_covariate`'s index.
pub fn project(
    model: &RegressionModel,
    future_covariate: &TimeSeries,
    rng: &mut StdRng,
) -> SimResult<Vec<f64>> {
    if model.residuals.is_empty() {
        return Err(SimError::InsufficientData { needed: 1, got: 0 });
    }

    Ok(future_covariate
        .values()
        .iter()
        .map(|&x| model.predict(x) + model.residuals[rng.gen_range(0..model.residuals.len())])
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::stream;

    fn series(pairs: &[(i32, f64)]) -> TimeSeries {
        TimeSeries::from_pairs(pairs.to_vec()).unwrap()
    }

    fn linear_pair(n: usize, a: f64, b: f64) -> (TimeSeries, TimeSeries) {
        let covariate: Vec<(i32, f64)> =
            (0..n).map(|i| (1990 + i as i32, 10.0 + 0.3 * i as f64)).collect();
        let local: Vec<(i32, f64)> = covariate
            .iter()
            .map(|&(year, x)| (year, a + b * x))
            .collect();
        (series(&local), series(&covariate))
    }

    #[test]
    fn noiseless_line_is_recovered_exactly() {
        let (local, covariate) = linear_pair(25, 2.0, 3.0);
        let model = fit(&local, &covariate).unwrap();

        assert!((model.intercept - 2.0).abs() < 1e-8, "intercept {}", model.intercept);
        assert!((model.slope - 3.0).abs() < 1e-8, "slope {}", model.slope);
        assert!(model.residuals.iter().all(|r| r.abs() < 1e-8));
        assert!((model.r_squared() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn fit_uses_only_overlapping_years() {
        let local = series(&[(2000, 1.0), (2001, 2.0), (2002, 3.0), (2003, 4.0)]);
        let covariate = series(&[(2001, 1.0), (2002, 2.0), (2003, 3.0), (2004, 4.0)]);
        let model = fit(&local, &covariate).unwrap();
        assert_eq!(model.years, vec![2001, 2002, 2003]);
        assert_eq!(model.n(), 3);
    }

    #[test]
    fn constant_covariate_is_singular() {
        let local = series(&[(2000, 1.0), (2001, 2.0), (2002, 3.0)]);
        let covariate = series(&[(2000, 5.0), (2001, 5.0), (2002, 5.0)]);
        assert!(matches!(
            fit(&local, &covariate),
            Err(SimError::SingularFit { .. })
        ));
    }

    #[test]
    fn single_overlap_is_insufficient() {
        let local = series(&[(2000, 1.0), (2001, 2.0)]);
        let covariate = series(&[(2001, 5.0), (2002, 6.0)]);
        assert!(matches!(
            fit(&local, &covariate),
            Err(SimError::InsufficientData { needed: 2, got: 1 })
        ));
    }

    #[test]
    fn projection_with_zero_residuals_is_the_line() {
        let (local, covariate) = linear_pair(20, -1.0, 0.5);
        let model = fit(&local, &covariate).unwrap();

        let future = series(&[(2020, 20.0), (2021, 21.0), (2022, 22.0)]);
        let traj = project(&model, &future, &mut stream(5)).unwrap();
        let expected: Vec<f64> = future.values().iter().map(|&x| -1.0 + 0.5 * x).collect();
        for (t, e) in traj.iter().zip(expected.iter()) {
            assert!((t - e).abs() < 1e-7, "got {t}, want {e}");
        }
    }

    #[test]
    fn projection_is_reproducible_and_aligned() {
        let covariate: Vec<(i32, f64)> = (0..30).map(|i| (1990 + i, 10.0 + 0.3 * i as f64)).collect();
        let local: Vec<(i32, f64)> = covariate
            .iter()
            .enumerate()
            .map(|(i, &(year, x))| (year, 1.0 + 2.0 * x + if i % 2 == 0 { 0.4 } else { -0.4 }))
            .collect();
        let model = fit(&series(&local), &series(&covariate)).unwrap();

        let future = series(&[(2025, 19.0), (2026, 19.5), (2027, 20.0), (2028, 20.5)]);
        let a = project(&model, &future, &mut stream(6)).unwrap();
        let b = project(&model, &future, &mut stream(6)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), future.len());
    }
}
