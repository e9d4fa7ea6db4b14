//! Credible intervals for posterior conversion rates.
//!
//! Intervals are equal-tailed: for a credible percentage `p`, the tail mass on
//! each side is `t = (100 - p) / 200`, and the bounds are the posterior
//! quantiles at `t` and `1 - t`.
//!
//! This approximates a highest-posterior-density (HPD) interval. For the
//! near-symmetric posteriors typical of conversion tests the two are close,
//! but for skewed posteriors (few conversions) the equal-tailed interval is
//! shifted towards the long tail compared to the true HPD interval.

use crate::{error::InvalidConfigError, posterior::Posterior};

/// Default credible-interval percentage.
pub const DEFAULT_CREDIBLE_INTERVAL_PERCENT: f64 = 95.0;

/// Conversion-rate bounds on the percentage scale (`0.0..=100.0`).
///
/// Bounds are rounded to two decimal places.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CredibleInterval {
    pub lower: f64,
    pub upper: f64,
}

impl CredibleInterval {
    /// Returns `true` if `rate_percent` lies within the bounds (inclusive).
    #[must_use]
    pub fn contains(&self, rate_percent: f64) -> bool {
        (self.lower..=self.upper).contains(&rate_percent)
    }
}

/// Checks that a credible-interval percentage lies in `(0, 100]`.
pub fn validate_percent(percent: f64) -> Result<(), InvalidConfigError> {
    if percent > 0.0 && percent <= 100.0 {
        Ok(())
    } else {
        Err(InvalidConfigError::CredibleIntervalOutOfRange { percent })
    }
}

/// Computes the equal-tailed credible interval of `posterior`.
///
/// # Examples
///
/// ```
/// use abayes_stats::{credible::credible_interval, posterior::Posterior};
///
/// let posterior = Posterior::from_shapes(121.0, 1181.0).unwrap();
/// let interval = credible_interval(&posterior, 95.0).unwrap();
/// assert!(interval.lower < 9.23 && 9.23 < interval.upper);
///
/// assert!(credible_interval(&posterior, 0.0).is_err());
/// ```
pub fn credible_interval(
    posterior: &Posterior,
    percent: f64,
) -> Result<CredibleInterval, InvalidConfigError> {
    validate_percent(percent)?;
    let tail = (100.0 - percent) / 200.0;
    let dist = posterior.distribution();
    let lower = to_rounded_percent(dist.quantile(tail));
    let upper = to_rounded_percent(dist.quantile(1.0 - tail));
    Ok(CredibleInterval {
        lower,
        upper: upper.max(lower),
    })
}

fn to_rounded_percent(fraction: f64) -> f64 {
    ((fraction * 100.0).clamp(0.0, 100.0) * 100.0).round() / 100.0
}
