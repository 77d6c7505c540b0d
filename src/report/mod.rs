//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/simulation code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::domain::{FittedDistribution, QuantileBand, RegressionModel, TimeSeries};

/// One-paragraph summary of an observed series.
pub fn format_series_summary(series: &TimeSeries) -> String {
    let values = series.values();
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    format!(
        "series: {} observations, years {}..{}, values {:.4}..{:.4}",
        series.len(),
        series.years().first().copied().unwrap_or(0),
        series.last_year().unwrap_or(0),
        min,
        max
    )
}

/// Parameter table for a fitted distribution.
pub fn format_fit_summary(fitted: &FittedDistribution) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "fitted {} (n={}, log-likelihood {:.4})\n",
        fitted.family, fitted.n, fitted.log_likelihood
    ));
    for (i, name) in fitted.param_names.iter().enumerate() {
        let se = fitted
            .std_errors
            .as_ref()
            .map(|s| format!(" (se {:.5})", s[i]))
            .unwrap_or_default();
        out.push_str(&format!("  {name:<10} {:.6}{se}\n", fitted.params[i]));
    }
    if fitted.std_errors.is_none() {
        out.push_str("  (standard errors unavailable: information matrix not invertible)\n");
    }
    out
}

/// One-line summary of a downscaling regression.
pub fn format_regression_summary(model: &RegressionModel) -> String {
    format!(
        "downscaling fit: local = {:.4} + {:.4} * covariate  (n={}, R^2={:.3})",
        model.intercept,
        model.slope,
        model.n(),
        model.r_squared()
    )
}

/// Quantile levels alongside their values, one per line.
pub fn format_quantile_summary(summary: &[(f64, f64)]) -> String {
    let mut out = String::new();
    for (level, value) in summary {
        out.push_str(&format!("  q{:<5} {value:.6}\n", format_level(*level)));
    }
    out
}

/// Fixed-width band table matching the CSV export column order.
pub fn format_bands_table(bands: &[QuantileBand], low: f64, high: f64) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<6} {:>12} {:>12} {:>12}\n",
        "year",
        format!("q{}", format_level(low)),
        "median",
        format!("q{}", format_level(high)),
    ));
    for band in bands {
        out.push_str(&format!(
            "{:<6} {:>12.4} {:>12.4} {:>12.4}\n",
            band.year, band.lower, band.median, band.upper
        ));
    }
    out
}

fn format_level(level: f64) -> String {
    // 0.05 -> "0.05", 0.5 -> "0.50"
    format!("{level:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_summary_lists_each_parameter() {
        let fitted = FittedDistribution {
            family: "weibull".to_string(),
            param_names: vec!["shape".to_string(), "scale".to_string()],
            params: vec![2.0, 3.0],
            log_likelihood: -80.0,
            std_errors: None,
            n: 30,
        };
        let text = format_fit_summary(&fitted);
        assert!(text.contains("shape"));
        assert!(text.contains("scale"));
        assert!(text.contains("standard errors unavailable"));
    }

    #[test]
    fn bands_table_has_one_row_per_band() {
        let bands = vec![
            QuantileBand { year: 2030, lower: 1.0, median: 2.0, upper: 3.0 },
            QuantileBand { year: 2031, lower: 1.0, median: 2.0, upper: 3.0 },
        ];
        let text = format_bands_table(&bands, 0.05, 0.95);
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("q0.05"));
        assert!(text.contains("q0.95"));
    }
}
