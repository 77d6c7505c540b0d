//! Distribution family descriptors.
//!
//! A family is a table entry, not an enum arm: the fitter and the projector
//! only ever call through the descriptor's function fields, so adding a
//! family means registering one more descriptor, with no dispatcher edits.
//!
//! Each descriptor supplies:
//! - a support predicate over the raw data
//! - a log-likelihood of parameters given data
//! - a moment-based starting point for the optimizer
//! - positivity constraints per parameter
//! - a native-parameter sampler
//! - the family's natural-space location/scale shift rule

use rand::rngs::StdRng;
use rand_distr::{Distribution, Gumbel, LogNormal, Weibull};

use crate::error::{SimError, SimResult};

/// Euler-Mascheroni constant (mean of the standard Gumbel).
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// A parametric family the fitter can work with.
///
/// Plain function pointers keep descriptors usable as `static` table entries.
pub struct Family {
    pub name: &'static str,
    pub param_names: &'static [&'static str],
    /// Returns the first data value violating the family's support, if any.
    pub support_violation: fn(&[f64]) -> Option<f64>,
    /// Log-likelihood of `data` under `params`; non-finite for invalid
    /// parameters.
    pub log_lik: fn(&[f64], &[f64]) -> f64,
    /// Moment-based starting point for the optimizer.
    pub init: fn(&[f64]) -> Vec<f64>,
    /// Which parameters are constrained positive (optimized on the log
    /// scale).
    pub positive: &'static [bool],
    /// Draw `n` samples under `params`.
    pub sample: fn(&[f64], usize, &mut StdRng) -> SimResult<Vec<f64>>,
    /// Apply `(location_shift, scale_multiplier)` in the family's natural
    /// parameter space.
    pub shift: fn(&[f64], f64, f64) -> SimResult<Vec<f64>>,
}

/// Families available by name on the CLI surface.
///
/// Library callers may pass any `&Family`, registered here or not.
pub static BUILTIN_FAMILIES: &[&Family] = &[&LOG_NORMAL, &WEIBULL, &GUMBEL];

/// Look up a builtin family by name.
pub fn lookup(name: &str) -> SimResult<&'static Family> {
    BUILTIN_FAMILIES
        .iter()
        .find(|f| f.name == name)
        .copied()
        .ok_or_else(|| SimError::UnknownFamily { name: name.to_string() })
}

// ---- log-normal ----

pub static LOG_NORMAL: Family = Family {
    name: "log-normal",
    param_names: &["meanlog", "sdlog"],
    support_violation: positive_support,
    log_lik: log_normal_log_lik,
    init: log_normal_init,
    positive: &[false, true],
    sample: log_normal_sample,
    shift: location_scale_shift,
};

fn log_normal_log_lik(params: &[f64], data: &[f64]) -> f64 {
    let (mu, sigma) = (params[0], params[1]);
    if !(sigma.is_finite() && sigma > 0.0 && mu.is_finite()) {
        return f64::NEG_INFINITY;
    }
    let ln_norm = sigma.ln() + 0.5 * (2.0 * std::f64::consts::PI).ln();
    data.iter()
        .map(|&x| {
            let lx = x.ln();
            let z = (lx - mu) / sigma;
            -lx - ln_norm - 0.5 * z * z
        })
        .sum()
}

fn log_normal_init(data: &[f64]) -> Vec<f64> {
    let logs: Vec<f64> = data.iter().map(|x| x.ln()).collect();
    let mu = mean(&logs);
    vec![mu, sd(&logs, mu).max(1e-6)]
}

fn log_normal_sample(params: &[f64], n: usize, rng: &mut StdRng) -> SimResult<Vec<f64>> {
    let dist = LogNormal::new(params[0], params[1])
        .map_err(|e| SimError::Numeric { context: format!("log-normal sampler: {e}") })?;
    Ok((0..n).map(|_| dist.sample(rng)).collect())
}

// ---- Weibull ----

pub static WEIBULL: Family = Family {
    name: "weibull",
    param_names: &["shape", "scale"],
    support_violation: positive_support,
    log_lik: weibull_log_lik,
    init: weibull_init,
    positive: &[true, true],
    sample: weibull_sample,
    shift: weibull_shift,
};

fn weibull_log_lik(params: &[f64], data: &[f64]) -> f64 {
    let (k, lambda) = (params[0], params[1]);
    if !(k.is_finite() && lambda.is_finite() && k > 0.0 && lambda > 0.0) {
        return f64::NEG_INFINITY;
    }
    let ln_k = k.ln();
    let ln_lambda = lambda.ln();
    data.iter()
        .map(|&x| {
            let r = x / lambda;
            ln_k - ln_lambda + (k - 1.0) * (x.ln() - ln_lambda) - r.powf(k)
        })
        .sum()
}

fn weibull_init(data: &[f64]) -> Vec<f64> {
    // Moment-match on the log scale: sd(ln X) = pi / (k sqrt(6)) and
    // E[ln X] = ln(lambda) - gamma / k.
    let logs: Vec<f64> = data.iter().map(|x| x.ln()).collect();
    let mu = mean(&logs);
    let s = sd(&logs, mu).max(1e-6);
    let k = (std::f64::consts::PI / (s * 6.0_f64.sqrt())).clamp(0.05, 200.0);
    let lambda = (mu + EULER_GAMMA / k).exp();
    vec![k, lambda]
}

fn weibull_sample(params: &[f64], n: usize, rng: &mut StdRng) -> SimResult<Vec<f64>> {
    // rand_distr takes (scale, shape).
    let dist = Weibull::new(params[1], params[0])
        .map_err(|e| SimError::Numeric { context: format!("weibull sampler: {e}") })?;
    Ok((0..n).map(|_| dist.sample(rng)).collect())
}

fn weibull_shift(params: &[f64], location_shift: f64, scale_mult: f64) -> SimResult<Vec<f64>> {
    // The two-parameter Weibull has no separate location parameter; its scale
    // doubles as the location-like parameter, so the shift translates the
    // scale before the multiplier is applied.
    let scale = (params[1] + location_shift) * scale_mult;
    if !(scale.is_finite() && scale > 0.0) {
        return Err(SimError::InvalidShift { scale });
    }
    Ok(vec![params[0], scale])
}

// ---- Gumbel ----

pub static GUMBEL: Family = Family {
    name: "gumbel",
    param_names: &["location", "scale"],
    support_violation: finite_support,
    log_lik: gumbel_log_lik,
    init: gumbel_init,
    positive: &[false, true],
    sample: gumbel_sample,
    shift: location_scale_shift,
};

fn gumbel_log_lik(params: &[f64], data: &[f64]) -> f64 {
    let (mu, beta) = (params[0], params[1]);
    if !(beta.is_finite() && beta > 0.0 && mu.is_finite()) {
        return f64::NEG_INFINITY;
    }
    let ln_beta = beta.ln();
    data.iter()
        .map(|&x| {
            let z = (x - mu) / beta;
            -ln_beta - z - (-z).exp()
        })
        .sum()
}

fn gumbel_init(data: &[f64]) -> Vec<f64> {
    let m = mean(data);
    let beta = (sd(data, m) * 6.0_f64.sqrt() / std::f64::consts::PI).max(1e-6);
    vec![m - EULER_GAMMA * beta, beta]
}

fn gumbel_sample(params: &[f64], n: usize, rng: &mut StdRng) -> SimResult<Vec<f64>> {
    let dist = Gumbel::new(params[0], params[1])
        .map_err(|e| SimError::Numeric { context: format!("gumbel sampler: {e}") })?;
    Ok((0..n).map(|_| dist.sample(rng)).collect())
}

// ---- shared helpers ----

/// Shift rule for families whose first parameter is a location and second a
/// scale (in their natural space).
fn location_scale_shift(params: &[f64], location_shift: f64, scale_mult: f64) -> SimResult<Vec<f64>> {
    let scale = params[1] * scale_mult;
    if !(scale.is_finite() && scale > 0.0) {
        return Err(SimError::InvalidShift { scale });
    }
    Ok(vec![params[0] + location_shift, scale])
}

fn positive_support(data: &[f64]) -> Option<f64> {
    data.iter().copied().find(|x| !(x.is_finite() && *x > 0.0))
}

fn finite_support(data: &[f64]) -> Option<f64> {
    data.iter().copied().find(|x| !x.is_finite())
}

fn mean(xs: &[f64]) -> f64 {
    xs.iter().sum::<f64>() / xs.len() as f64
}

fn sd(xs: &[f64], mean: f64) -> f64 {
    if xs.len() < 2 {
        return 0.0;
    }
    let ss: f64 = xs.iter().map(|x| (x - mean) * (x - mean)).sum();
    (ss / (xs.len() - 1) as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_finds_builtins() {
        assert_eq!(lookup("log-normal").unwrap().name, "log-normal");
        assert_eq!(lookup("weibull").unwrap().name, "weibull");
        assert_eq!(lookup("gumbel").unwrap().name, "gumbel");
        assert!(matches!(lookup("cauchy"), Err(SimError::UnknownFamily { .. })));
    }

    #[test]
    fn positive_support_flags_first_offender() {
        assert_eq!(positive_support(&[1.0, -1.0, 2.0]), Some(-1.0));
        assert_eq!(positive_support(&[1.0, 0.0]), Some(0.0));
        assert_eq!(positive_support(&[1.0, 2.0]), None);
    }

    #[test]
    fn log_normal_log_lik_peaks_near_truth() {
        // Data exactly at exp(mu): the likelihood at (mu, sigma) must beat a
        // far-off alternative.
        let data = [std::f64::consts::E; 8];
        let near = log_normal_log_lik(&[1.0, 0.5], &data);
        let far = log_normal_log_lik(&[4.0, 0.5], &data);
        assert!(near > far);
    }

    #[test]
    fn invalid_scale_gives_neg_infinity() {
        assert_eq!(log_normal_log_lik(&[0.0, 0.0], &[1.0]), f64::NEG_INFINITY);
        assert_eq!(weibull_log_lik(&[1.0, -2.0], &[1.0]), f64::NEG_INFINITY);
        assert_eq!(gumbel_log_lik(&[0.0, 0.0], &[1.0]), f64::NEG_INFINITY);
    }

    #[test]
    fn location_scale_shift_moves_both_parameters() {
        let shifted = location_scale_shift(&[1.0, 2.0], 0.5, 1.5).unwrap();
        assert_eq!(shifted, vec![1.5, 3.0]);
    }

    #[test]
    fn shift_rejects_non_positive_scale() {
        assert!(matches!(
            location_scale_shift(&[1.0, 2.0], 0.0, 0.0),
            Err(SimError::InvalidShift { .. })
        ));
        assert!(matches!(
            weibull_shift(&[1.5, 2.0], -3.0, 1.0),
            Err(SimError::InvalidShift { .. })
        ));
    }

    #[test]
    fn weibull_init_is_in_range_on_clean_data() {
        let data: Vec<f64> = (1..=50).map(|i| 0.2 * i as f64).collect();
        let theta = weibull_init(&data);
        assert!(theta[0] > 0.0 && theta[0].is_finite());
        assert!(theta[1] > 0.0 && theta[1].is_finite());
    }
}
