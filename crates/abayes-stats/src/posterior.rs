//! Posterior estimation via Beta-Binomial conjugacy.
//!
//! A Beta prior over the conversion rate combined with `conversions` successes
//! out of `visitors` trials yields a Beta posterior:
//!
//! ```text
//! posterior.alpha = prior.alpha + conversions
//! posterior.beta  = prior.beta  + visitors - conversions
//! ```
//!
//! Posteriors are never updated in place; every new set of observations is
//! rederived from the prior.
//!
//! # Examples
//!
//! ```
//! use abayes_stats::posterior::{Prior, VariantObservation, derive_posteriors};
//!
//! let a = VariantObservation::new("Variant A", 1300, 120);
//! let b = VariantObservation::new("Variant B", 1275, 125);
//! let (post_a, post_b) = derive_posteriors(&Prior::default(), &a, &b).unwrap();
//!
//! assert_eq!((post_a.alpha(), post_a.beta()), (121.0, 1181.0));
//! assert_eq!((post_b.alpha(), post_b.beta()), (126.0, 1151.0));
//! ```

use crate::{
    beta::BetaDistribution,
    error::{InvalidConfigError, InvalidInputError},
};

/// Largest supported visitor count.
///
/// Quantiles of Beta distributions with larger shapes fail to converge.
pub const MAX_COUNT: u64 = 100_000_000_000_000;

/// Largest supported prior shape, in pseudo-observations.
pub const MAX_PRIOR_SHAPE: f64 = 1_000_000.0;

/// Beta prior over a conversion rate.
///
/// The default is the uniform prior `Beta(1, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prior {
    alpha: f64,
    beta: f64,
}

impl Default for Prior {
    fn default() -> Self {
        Self::UNIFORM
    }
}

impl Prior {
    /// Uniform prior: every conversion rate is equally likely.
    pub const UNIFORM: Self = Self {
        alpha: 1.0,
        beta: 1.0,
    };

    /// Creates a prior, rejecting shapes outside `(0, MAX_PRIOR_SHAPE]`.
    pub fn new(alpha: f64, beta: f64) -> Result<Self, InvalidConfigError> {
        for (name, value) in [("alpha", alpha), ("beta", beta)] {
            if !(value > 0.0 && value <= MAX_PRIOR_SHAPE) {
                return Err(InvalidConfigError::InvalidPrior { name, value });
            }
        }
        Ok(Self { alpha, beta })
    }

    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    #[must_use]
    pub fn beta(&self) -> f64 {
        self.beta
    }
}

/// Visitor and conversion counts observed for one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantObservation {
    pub label: String,
    pub visitors: u64,
    pub conversions: u64,
}

impl VariantObservation {
    pub fn new<S>(label: S, visitors: u64, conversions: u64) -> Self
    where
        S: Into<String>,
    {
        Self {
            label: label.into(),
            visitors,
            conversions,
        }
    }

    /// Checks that the counts describe a usable conversion test.
    pub fn validate(&self) -> Result<(), InvalidInputError> {
        if self.visitors == 0 {
            return Err(InvalidInputError::NoVisitors {
                label: self.label.clone(),
            });
        }
        if self.visitors > MAX_COUNT {
            return Err(InvalidInputError::CountTooLarge {
                label: self.label.clone(),
                visitors: self.visitors,
            });
        }
        if self.conversions > self.visitors {
            return Err(InvalidInputError::ConversionsExceedVisitors {
                label: self.label.clone(),
                visitors: self.visitors,
                conversions: self.conversions,
            });
        }
        Ok(())
    }

    /// Observed conversion rate `conversions / visitors`.
    ///
    /// Returns `None` when there are no visitors.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn raw_rate(&self) -> Option<f64> {
        (self.visitors > 0).then(|| self.conversions as f64 / self.visitors as f64)
    }
}

/// Posterior Beta distribution of a variant's conversion rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Posterior {
    distribution: BetaDistribution,
}

impl Posterior {
    /// Combines `prior` with a single variant's observation.
    #[expect(clippy::cast_precision_loss)]
    pub fn from_observation(
        prior: &Prior,
        observation: &VariantObservation,
    ) -> Result<Self, InvalidInputError> {
        observation.validate()?;
        let successes = observation.conversions as f64;
        let failures = (observation.visitors - observation.conversions) as f64;
        let distribution = BetaDistribution::new(prior.alpha + successes, prior.beta + failures)
            .map_err(|_| InvalidInputError::InvalidPosterior {
                label: observation.label.clone(),
            })?;
        Ok(Self { distribution })
    }

    /// Wraps an existing Beta distribution as a posterior.
    #[must_use]
    pub fn from_distribution(distribution: BetaDistribution) -> Self {
        Self { distribution }
    }

    /// Creates a posterior directly from shape parameters.
    pub fn from_shapes(alpha: f64, beta: f64) -> Result<Self, InvalidConfigError> {
        BetaDistribution::new(alpha, beta).map(Self::from_distribution)
    }

    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.distribution.alpha()
    }

    #[must_use]
    pub fn beta(&self) -> f64 {
        self.distribution.beta()
    }

    #[must_use]
    pub fn distribution(&self) -> &BetaDistribution {
        &self.distribution
    }
}

/// Derives the posteriors of both variants from a shared prior.
///
/// Fails if either observation has no visitors or more conversions than
/// visitors; in that case no posterior is produced for the pair.
pub fn derive_posteriors(
    prior: &Prior,
    a: &VariantObservation,
    b: &VariantObservation,
) -> Result<(Posterior, Posterior), InvalidInputError> {
    let post_a = Posterior::from_observation(prior, a)?;
    let post_b = Posterior::from_observation(prior, b)?;
    tracing::debug!(
        a.label = %a.label,
        a.alpha = post_a.alpha(),
        a.beta = post_a.beta(),
        b.label = %b.label,
        b.alpha = post_b.alpha(),
        b.beta = post_b.beta(),
        "derived posteriors"
    );
    Ok((post_a, post_b))
}
