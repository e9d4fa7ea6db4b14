//! Beta distribution used to model uncertainty about a conversion rate.
//!
//! [`BetaDistribution`] bundles the shape parameters with the two numeric
//! backends it relies on:
//!
//! - `statrs` for the density, the cumulative distribution and its inverse
//!   (the quantile function used for credible intervals)
//! - `rand_distr` for drawing random variates in Monte Carlo simulations

use rand::Rng;
use rand_distr::Distribution as _;
use statrs::distribution::{Continuous as _, ContinuousCDF as _};

use crate::error::InvalidConfigError;

/// A Beta(alpha, beta) distribution on `[0, 1]`.
///
/// # Examples
///
/// ```
/// use abayes_stats::beta::BetaDistribution;
///
/// let uniform = BetaDistribution::new(1.0, 1.0).unwrap();
/// assert_eq!(uniform.mean(), 0.5);
/// assert!((uniform.cdf(0.25) - 0.25).abs() < 1e-12);
/// assert!((uniform.pdf(0.7) - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BetaDistribution {
    alpha: f64,
    beta: f64,
    density: statrs::distribution::Beta,
    sampler: rand_distr::Beta<f64>,
}

impl PartialEq for BetaDistribution {
    fn eq(&self, other: &Self) -> bool {
        self.alpha == other.alpha && self.beta == other.beta
    }
}

impl BetaDistribution {
    /// Creates a Beta distribution with the given shape parameters.
    ///
    /// Both parameters must be positive and finite.
    pub fn new(alpha: f64, beta: f64) -> Result<Self, InvalidConfigError> {
        let invalid = || InvalidConfigError::InvalidShape { alpha, beta };
        if !(alpha.is_finite() && beta.is_finite() && alpha > 0.0 && beta > 0.0) {
            return Err(invalid());
        }
        let density = statrs::distribution::Beta::new(alpha, beta).map_err(|_| invalid())?;
        let sampler = rand_distr::Beta::new(alpha, beta).map_err(|_| invalid())?;
        Ok(Self {
            alpha,
            beta,
            density,
            sampler,
        })
    }

    /// Returns the first shape parameter.
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Returns the second shape parameter.
    #[must_use]
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Mean of the distribution: `alpha / (alpha + beta)`.
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.alpha / (self.alpha + self.beta)
    }

    /// Variance: `alpha * beta / ((alpha + beta)^2 * (alpha + beta + 1))`.
    #[must_use]
    pub fn variance(&self) -> f64 {
        let sum = self.alpha + self.beta;
        self.alpha * self.beta / (sum * sum * (sum + 1.0))
    }

    /// Mode of the distribution, defined only when both shapes exceed 1.
    #[must_use]
    pub fn mode(&self) -> Option<f64> {
        (self.alpha > 1.0 && self.beta > 1.0)
            .then(|| (self.alpha - 1.0) / (self.alpha + self.beta - 2.0))
    }

    /// Probability density at `x`.
    ///
    /// Returns `0.0` outside `[0, 1]`. At the boundaries the density is
    /// unbounded when the matching shape parameter is below 1, in which case
    /// an infinite value is returned.
    #[must_use]
    pub fn pdf(&self, x: f64) -> f64 {
        if !(0.0..=1.0).contains(&x) {
            return 0.0;
        }
        self.density.pdf(x)
    }

    /// Cumulative probability `P(X <= x)`, clamped to `[0, 1]`.
    #[must_use]
    pub fn cdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        self.density.cdf(x).clamp(0.0, 1.0)
    }

    /// Quantile function (inverse CDF): the `x` such that `P(X <= x) = p`.
    ///
    /// Probabilities at or beyond 0 and 1 map to the ends of the support.
    #[must_use]
    pub fn quantile(&self, p: f64) -> f64 {
        if p <= 0.0 {
            return 0.0;
        }
        if p >= 1.0 {
            return 1.0;
        }
        self.density.inverse_cdf(p).clamp(0.0, 1.0)
    }

    /// Draws one random variate from the distribution.
    pub fn sample<R>(&self, rng: &mut R) -> f64
    where
        R: Rng + ?Sized,
    {
        self.sampler.sample(rng)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_rejects_invalid_shapes() {
        for (alpha, beta) in [
            (0.0, 1.0),
            (1.0, 0.0),
            (-1.0, 2.0),
            (f64::NAN, 1.0),
            (1.0, f64::INFINITY),
        ] {
            assert!(
                BetaDistribution::new(alpha, beta).is_err(),
                "({alpha}, {beta}) should be rejected"
            );
        }
    }

    #[test]
    fn test_summary_statistics() {
        let dist = BetaDistribution::new(121.0, 1181.0).unwrap();
        assert!((dist.mean() - 121.0 / 1302.0).abs() < 1e-12);
        assert!((dist.mode().unwrap() - 120.0 / 1300.0).abs() < 1e-12);
        let expected_var = 121.0 * 1181.0 / (1302.0 * 1302.0 * 1303.0);
        assert!((dist.variance() - expected_var).abs() < 1e-15);

        let flat = BetaDistribution::new(1.0, 5.0).unwrap();
        assert_eq!(flat.mode(), None);
    }

    #[test]
    fn test_pdf_matches_closed_form() {
        // Beta(2, 3): pdf(x) = 12 x (1 - x)^2
        let dist = BetaDistribution::new(2.0, 3.0).unwrap();
        for x in [0.1, 0.25, 0.5, 0.9] {
            let expected = 12.0 * x * (1.0 - x) * (1.0 - x);
            assert!((dist.pdf(x) - expected).abs() < 1e-9, "pdf({x})");
        }
        assert_eq!(dist.pdf(-0.1), 0.0);
        assert_eq!(dist.pdf(1.1), 0.0);
    }

    #[test]
    fn test_cdf_and_quantile_are_inverse() {
        let dist = BetaDistribution::new(121.0, 1181.0).unwrap();
        for p in [0.025, 0.25, 0.5, 0.75, 0.975] {
            let x = dist.quantile(p);
            assert!((dist.cdf(x) - p).abs() < 1e-6, "cdf(quantile({p}))");
        }
        assert_eq!(dist.quantile(0.0), 0.0);
        assert_eq!(dist.quantile(1.0), 1.0);
        assert_eq!(dist.cdf(-1.0), 0.0);
        assert_eq!(dist.cdf(2.0), 1.0);
    }

    #[test]
    fn test_samples_stay_in_unit_interval() {
        let dist = BetaDistribution::new(0.5, 0.5).unwrap();
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..1000 {
            let x = dist.sample(&mut rng);
            assert!((0.0..=1.0).contains(&x));
        }
    }

    #[test]
    #[expect(clippy::cast_precision_loss)]
    fn test_sample_mean_converges() {
        let dist = BetaDistribution::new(126.0, 1151.0).unwrap();
        let mut rng = Pcg32::seed_from_u64(42);
        let n: usize = 20_000;
        let mean = (0..n).map(|_| dist.sample(&mut rng)).sum::<f64>() / n as f64;
        assert!((mean - dist.mean()).abs() < 1e-3);
    }
}
