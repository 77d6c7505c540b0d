//! Crate-wide error type.
//!
//! Every failure mode is a local, recoverable condition that carries enough
//! context (operation, offending values) for the caller to correct the input.
//! Nothing is silently swallowed or auto-corrected: degenerate inputs fail
//! fast instead of propagating NaNs into downstream simulation.

/// Result alias used throughout the crate.
pub type SimResult<T> = Result<T, SimError>;

#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// Not enough observations for the requested operation.
    InsufficientData { needed: usize, got: usize },

    /// Requested sample size exceeds the available population when drawing
    /// without replacement (or an invalid block length was requested).
    SampleSize { requested: usize, available: usize },

    /// Quantile level outside [0, 1], or an unordered low/mid/high triple.
    InvalidQuantile { level: f64 },

    /// A value violates a distribution family's support constraint.
    DomainViolation { family: &'static str, value: f64 },

    /// The optimizer did not converge within its iteration budget.
    NoConvergence { iterations: usize },

    /// Degenerate regression input (covariate with ~zero variance).
    SingularFit { variance: f64 },

    /// A shifted distribution's scale parameter left the valid domain.
    InvalidShift { scale: f64 },

    /// An ensemble of fewer than one trajectory was requested.
    EmptyEnsemble { n: usize },

    /// A series value is NaN or infinite (caller must drop/impute first).
    NonFiniteValue { year: i32 },

    /// Series years are not strictly increasing.
    UnorderedYears { year: i32 },

    /// Years and values differ in length, or a trajectory does not match
    /// its ensemble's time index.
    LengthMismatch { expected: usize, got: usize },

    /// No registered distribution family under this name.
    UnknownFamily { name: String },

    /// A fitted-distribution artifact was used with the wrong family.
    FamilyMismatch { expected: String, got: &'static str },

    /// Numerical backend failure (optimizer internals, non-finite results).
    Numeric { context: String },

    /// File or parse failure on the CLI surface.
    Io { context: String },
}

impl SimError {
    /// Process exit code for the CLI: 2 = input/config, 3 = not enough data,
    /// 4 = numeric/model failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            SimError::InvalidQuantile { .. }
            | SimError::UnknownFamily { .. }
            | SimError::NonFiniteValue { .. }
            | SimError::UnorderedYears { .. }
            | SimError::Io { .. } => 2,
            SimError::InsufficientData { .. } | SimError::SampleSize { .. } => 3,
            SimError::DomainViolation { .. }
            | SimError::NoConvergence { .. }
            | SimError::SingularFit { .. }
            | SimError::InvalidShift { .. }
            | SimError::EmptyEnsemble { .. }
            | SimError::LengthMismatch { .. }
            | SimError::FamilyMismatch { .. }
            | SimError::Numeric { .. } => 4,
        }
    }
}

impl std::fmt::Display for SimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimError::InsufficientData { needed, got } => {
                write!(f, "Insufficient data: need at least {needed} observations, got {got}")
            }
            SimError::SampleSize { requested, available } => {
                write!(
                    f,
                    "Sample size {requested} exceeds the {available} available observations"
                )
            }
            SimError::InvalidQuantile { level } => {
                write!(f, "Quantile level {level} outside [0, 1] or unordered")
            }
            SimError::DomainViolation { family, value } => {
                write!(f, "Value {value} outside the support of the {family} family")
            }
            SimError::NoConvergence { iterations } => {
                write!(f, "Fit did not converge within {iterations} iterations")
            }
            SimError::SingularFit { variance } => {
                write!(f, "Covariate variance {variance:e} is too small to fit a slope")
            }
            SimError::InvalidShift { scale } => {
                write!(f, "Shifted scale parameter {scale} is not positive")
            }
            SimError::EmptyEnsemble { n } => {
                write!(f, "Ensemble size must be >= 1, got {n}")
            }
            SimError::NonFiniteValue { year } => {
                write!(f, "Non-finite series value at year {year}")
            }
            SimError::UnorderedYears { year } => {
                write!(f, "Series years must be strictly increasing (at year {year})")
            }
            SimError::LengthMismatch { expected, got } => {
                write!(f, "Length mismatch: expected {expected}, got {got}")
            }
            SimError::UnknownFamily { name } => {
                write!(f, "Unknown distribution family '{name}'")
            }
            SimError::FamilyMismatch { expected, got } => {
                write!(f, "Fitted distribution is '{expected}', not '{got}'")
            }
            SimError::Numeric { context } => {
                write!(f, "Numerical failure: {context}")
            }
            SimError::Io { context } => {
                write!(f, "{context}")
            }
        }
    }
}

impl std::error::Error for SimError {}
