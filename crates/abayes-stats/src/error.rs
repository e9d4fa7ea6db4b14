//! Error types shared by the statistical components.
//!
//! Two families of failure are distinguished:
//!
//! - [`InvalidInputError`]: the observed data cannot describe a conversion test
//!   (no visitors, more conversions than visitors, counts that are unusable
//!   or too large to evaluate).
//! - [`InvalidConfigError`]: a user-tunable parameter is outside its domain
//!   (credible-interval percentage, prior shape, grid resolution, sample count).
//!
//! Numerical edge cases such as an all-zero density are *not* errors; they are
//! reported through sentinel values (see [`crate::density`]).

/// The observed data for a variant is malformed.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum InvalidInputError {
    #[display("variant '{label}' has no visitors")]
    NoVisitors { label: String },
    #[display("variant '{label}' has {conversions} conversions but only {visitors} visitors")]
    ConversionsExceedVisitors {
        label: String,
        visitors: u64,
        conversions: u64,
    },
    #[display(
        "variant '{label}' has {visitors} visitors, more than the supported {}",
        crate::posterior::MAX_COUNT
    )]
    CountTooLarge { label: String, visitors: u64 },
    #[display("variant '{label}' does not yield a valid posterior")]
    InvalidPosterior { label: String },
    #[display("expected at least 2 data rows, got {found}")]
    MissingRows { found: usize },
    #[display("row {row} has no value for field '{field}'")]
    MissingField { row: usize, field: String },
    #[display("field '{field}' in row {row} is not a non-negative integer count: {value}")]
    InvalidCount {
        row: usize,
        field: String,
        value: String,
    },
}

/// A configuration parameter is outside its valid domain.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum InvalidConfigError {
    #[display("credible interval percentage must be in (0, 100], got {percent}")]
    CredibleIntervalOutOfRange { percent: f64 },
    #[display(
        "prior {name} must be positive and at most {}, got {value}",
        crate::posterior::MAX_PRIOR_SHAPE
    )]
    InvalidPrior { name: &'static str, value: f64 },
    #[display("beta shape parameters must be positive and finite, got ({alpha}, {beta})")]
    InvalidShape { alpha: f64, beta: f64 },
    #[display("density resolution must be in (0, 1], got {resolution}")]
    InvalidResolution { resolution: f64 },
    #[display("minimum density must be a non-negative finite number, got {value}")]
    InvalidMinDensity { value: f64 },
    #[display("monte carlo sample count must be positive")]
    ZeroSampleCount,
}
