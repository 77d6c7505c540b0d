//! Maximum-likelihood fitting of a family descriptor.
//!
//! The fitter is generic over any `Family`: it maximizes the descriptor's
//! log-likelihood with a Nelder-Mead simplex over constraint-transformed
//! parameters (positive parameters are optimized on the log scale, so the
//! search space is unconstrained). Standard errors come from the observed
//! information at the optimum via a central-difference Hessian.
//!
//! Grid-free direct maximization keeps the fitter independent of family
//! internals; everything family-specific lives in the descriptor.

use argmin::core::{CostFunction, Error as ArgminError, Executor, State, TerminationReason, TerminationStatus};
use argmin::solver::neldermead::NelderMead;

use crate::dist::family::Family;
use crate::domain::FittedDistribution;
use crate::error::{SimError, SimResult};
use crate::math::hessian::standard_errors;

/// Iteration budget for the simplex search.
const MAX_ITERS: u64 = 1_000;

/// Cost returned for parameter vectors with a non-finite likelihood.
///
/// Large but finite, so the simplex can still rank and move away from
/// invalid vertices.
const INVALID_COST: f64 = 1e12;

/// Spread of the initial simplex around the starting point, in transformed
/// coordinates (log scale for positive parameters).
const SIMPLEX_SPREAD: f64 = 0.25;

struct NegLogLik<'a> {
    family: &'a Family,
    data: &'a [f64],
}

impl CostFunction for NegLogLik<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, z: &Self::Param) -> Result<f64, ArgminError> {
        let theta = from_unconstrained(self.family, z);
        let ll = (self.family.log_lik)(&theta, self.data);
        if ll.is_finite() { Ok(-ll) } else { Ok(INVALID_COST) }
    }
}

/// Fit `family` to `values` by maximum likelihood.
///
/// Fails with `DomainViolation` when a value lies outside the family's
/// support, and with `NoConvergence` when the simplex exhausts its iteration
/// budget. `std_errors` is `None` when the observed information is not
/// invertible at the optimum.
pub fn fit(values: &[f64], family: &Family) -> SimResult<FittedDistribution> {
    if values.len() < 3 {
        return Err(SimError::InsufficientData { needed: 3, got: values.len() });
    }
    if let Some(value) = (family.support_violation)(values) {
        return Err(SimError::DomainViolation { family: family.name, value });
    }

    let theta0 = (family.init)(values);
    let z0 = to_unconstrained(family, &theta0);

    let solver = NelderMead::new(initial_simplex(&z0))
        .with_sd_tolerance(1e-10)
        .map_err(|e| SimError::Numeric { context: format!("simplex setup: {e}") })?;
    let problem = NegLogLik { family, data: values };

    let result = Executor::new(problem, solver)
        .configure(|state| state.max_iters(MAX_ITERS))
        .run()
        .map_err(|e| SimError::Numeric { context: format!("optimizer: {e}") })?;

    let state = result.state();
    if matches!(
        state.get_termination_status(),
        TerminationStatus::Terminated(TerminationReason::MaxItersReached)
    ) {
        return Err(SimError::NoConvergence { iterations: state.get_iter() as usize });
    }

    let z_hat = state
        .get_best_param()
        .cloned()
        .ok_or_else(|| SimError::Numeric { context: "optimizer returned no parameters".to_string() })?;
    let params = from_unconstrained(family, &z_hat);

    let log_likelihood = (family.log_lik)(&params, values);
    if !log_likelihood.is_finite() {
        return Err(SimError::Numeric {
            context: format!("non-finite log-likelihood at the {} optimum", family.name),
        });
    }

    let ll = |theta: &[f64]| (family.log_lik)(theta, values);
    let std_errors = standard_errors(&ll, &params);

    Ok(FittedDistribution {
        family: family.name.to_string(),
        param_names: family.param_names.iter().map(|s| s.to_string()).collect(),
        params,
        log_likelihood,
        std_errors,
        n: values.len(),
    })
}

fn to_unconstrained(family: &Family, theta: &[f64]) -> Vec<f64> {
    theta
        .iter()
        .zip(family.positive.iter())
        .map(|(&t, &pos)| if pos { t.max(f64::MIN_POSITIVE).ln() } else { t })
        .collect()
}

fn from_unconstrained(family: &Family, z: &[f64]) -> Vec<f64> {
    z.iter()
        .zip(family.positive.iter())
        .map(|(&v, &pos)| if pos { v.exp() } else { v })
        .collect()
}

fn initial_simplex(z0: &[f64]) -> Vec<Vec<f64>> {
    let mut simplex = vec![z0.to_vec()];
    for i in 0..z0.len() {
        let mut vertex = z0.to_vec();
        vertex[i] += SIMPLEX_SPREAD;
        simplex.push(vertex);
    }
    simplex
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dist::family::{GUMBEL, LOG_NORMAL, WEIBULL};
    use crate::rng::stream;
    use rand_distr::{Distribution, Exp, LogNormal as LogNormalDist, Weibull as WeibullDist};

    fn log_normal_sample(mu: f64, sigma: f64, n: usize, seed: u64) -> Vec<f64> {
        let dist = LogNormalDist::new(mu, sigma).unwrap();
        let mut rng = stream(seed);
        (0..n).map(|_| dist.sample(&mut rng)).collect()
    }

    #[test]
    fn log_normal_fit_recovers_known_parameters() {
        let values = log_normal_sample(1.0, 0.2, 4000, 11);
        let fitted = fit(&values, &LOG_NORMAL).unwrap();
        assert!((fitted.params[0] - 1.0).abs() < 0.05, "meanlog {}", fitted.params[0]);
        assert!((fitted.params[1] - 0.2).abs() < 0.05, "sdlog {}", fitted.params[1]);
        assert!(fitted.log_likelihood.is_finite());
    }

    #[test]
    fn log_normal_fit_tightens_with_sample_size() {
        // Consistency: the recovery tolerance shrinks as n grows.
        let coarse = fit(&log_normal_sample(1.0, 0.2, 300, 12), &LOG_NORMAL).unwrap();
        let fine = fit(&log_normal_sample(1.0, 0.2, 3000, 13), &LOG_NORMAL).unwrap();
        assert!((coarse.params[0] - 1.0).abs() < 0.08);
        assert!((fine.params[0] - 1.0).abs() < 0.03);
    }

    #[test]
    fn log_normal_standard_errors_shrink_like_sqrt_n() {
        let fitted = fit(&log_normal_sample(1.0, 0.2, 4000, 14), &LOG_NORMAL).unwrap();
        let se = fitted.std_errors.expect("information matrix should invert");
        // se(meanlog) = sigma / sqrt(n) ~ 0.0032 here.
        assert!(se[0] > 0.0 && se[0] < 0.01, "se(meanlog) {}", se[0]);
        assert!(se[1] > 0.0 && se[1] < 0.01, "se(sdlog) {}", se[1]);
    }

    #[test]
    fn weibull_fit_recovers_known_parameters() {
        let dist = WeibullDist::new(3.0, 2.0).unwrap(); // scale 3, shape 2
        let mut rng = stream(15);
        let values: Vec<f64> = (0..4000).map(|_| dist.sample(&mut rng)).collect();

        let fitted = fit(&values, &WEIBULL).unwrap();
        assert!((fitted.params[0] - 2.0).abs() < 0.15, "shape {}", fitted.params[0]);
        assert!((fitted.params[1] - 3.0).abs() < 0.15, "scale {}", fitted.params[1]);
    }

    #[test]
    fn gumbel_fit_recovers_known_parameters() {
        let dist = rand_distr::Gumbel::new(4.0, 1.5).unwrap();
        let mut rng = stream(16);
        let values: Vec<f64> = (0..4000).map(|_| dist.sample(&mut rng)).collect();

        let fitted = fit(&values, &GUMBEL).unwrap();
        assert!((fitted.params[0] - 4.0).abs() < 0.15, "location {}", fitted.params[0]);
        assert!((fitted.params[1] - 1.5).abs() < 0.15, "scale {}", fitted.params[1]);
    }

    #[test]
    fn negative_value_violates_log_normal_support() {
        let err = fit(&[-1.0, 2.0, 3.0], &LOG_NORMAL).unwrap_err();
        assert_eq!(err, SimError::DomainViolation { family: "log-normal", value: -1.0 });
    }

    #[test]
    fn zero_value_violates_weibull_support() {
        let err = fit(&[0.0, 2.0, 3.0], &WEIBULL).unwrap_err();
        assert_eq!(err, SimError::DomainViolation { family: "weibull", value: 0.0 });
    }

    #[test]
    fn too_few_observations_are_rejected() {
        assert!(matches!(
            fit(&[1.0, 2.0], &LOG_NORMAL),
            Err(SimError::InsufficientData { needed: 3, got: 2 })
        ));
    }

    // A family registered outside the builtin table: the fitter must work
    // through the descriptor alone.
    static EXPONENTIAL: Family = Family {
        name: "exponential",
        param_names: &["rate"],
        support_violation: |data| data.iter().copied().find(|x| !(x.is_finite() && *x > 0.0)),
        log_lik: |params, data| {
            let rate = params[0];
            if !(rate.is_finite() && rate > 0.0) {
                return f64::NEG_INFINITY;
            }
            data.iter().map(|&x| rate.ln() - rate * x).sum()
        },
        init: |data| {
            let mean = data.iter().sum::<f64>() / data.len() as f64;
            vec![1.0 / mean.max(f64::MIN_POSITIVE)]
        },
        positive: &[true],
        sample: |params, n, rng| {
            let dist = Exp::new(params[0])
                .map_err(|e| SimError::Numeric { context: format!("exponential sampler: {e}") })?;
            Ok((0..n).map(|_| dist.sample(rng)).collect())
        },
        shift: |params, _loc, scale_mult| {
            // Rate is inverse scale.
            let rate = params[0] / scale_mult;
            if !(rate.is_finite() && rate > 0.0) {
                return Err(SimError::InvalidShift { scale: 1.0 / rate });
            }
            Ok(vec![rate])
        },
    };

    #[test]
    fn custom_family_fits_without_fitter_changes() {
        let dist = Exp::new(0.5).unwrap();
        let mut rng = stream(17);
        let values: Vec<f64> = (0..3000).map(|_| dist.sample(&mut rng)).collect();

        let fitted = fit(&values, &EXPONENTIAL).unwrap();
        assert_eq!(fitted.family, "exponential");
        assert!((fitted.params[0] - 0.5).abs() < 0.05, "rate {}", fitted.params[0]);
    }
}
