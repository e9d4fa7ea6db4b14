//! Monte Carlo estimate of which variant converts better.
//!
//! For each of `n` trials one conversion rate is drawn from each posterior;
//! the variant with the larger draw wins the trial. Ties (rare with continuous
//! draws) are counted as a win for variant B. The win probabilities are the
//! fraction of trials each variant won, so their counts always add up to `n`.
//!
//! The estimate's standard error is at most `0.5 / sqrt(n)`: about half a
//! percentage point at [`DEFAULT_SAMPLE_COUNT`].
//!
//! The random source is injected, so a seeded generator gives reproducible
//! results:
//!
//! ```
//! use abayes_stats::{posterior::Posterior, win_probability::win_probability};
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg32;
//!
//! let a = Posterior::from_shapes(121.0, 1181.0).unwrap();
//! let b = Posterior::from_shapes(126.0, 1151.0).unwrap();
//!
//! let first = win_probability(&a, &b, 10_000, &mut Pcg32::seed_from_u64(1)).unwrap();
//! let second = win_probability(&a, &b, 10_000, &mut Pcg32::seed_from_u64(1)).unwrap();
//! assert_eq!(first, second);
//! assert!(first.prob_b > first.prob_a);
//! ```

use rand::Rng;

use crate::{error::InvalidConfigError, posterior::Posterior};

/// Default number of Monte Carlo trials.
pub const DEFAULT_SAMPLE_COUNT: usize = 10_000;

/// One of the two compared variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    A,
    B,
}

/// Outcome of a Monte Carlo comparison of two posteriors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WinProbability {
    /// Estimated probability that A's true rate exceeds B's.
    pub prob_a: f64,
    /// Estimated probability that B's true rate is at least A's.
    pub prob_b: f64,
    pub wins_a: usize,
    pub wins_b: usize,
    pub samples: usize,
}

impl WinProbability {
    #[expect(clippy::cast_precision_loss)]
    fn from_counts(wins_a: usize, wins_b: usize) -> Self {
        let samples = wins_a + wins_b;
        let n = samples as f64;
        Self {
            prob_a: wins_a as f64 / n,
            prob_b: wins_b as f64 / n,
            wins_a,
            wins_b,
            samples,
        }
    }

    /// Win probabilities as whole percentages `(A, B)`, rounded half away from zero.
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn rounded_percentages(&self) -> (u32, u32) {
        let round = |p: f64| (p * 100.0).round() as u32;
        (round(self.prob_a), round(self.prob_b))
    }

    /// The variant reported as the likely winner.
    ///
    /// Decided on the rounded percentages; B on a tie.
    #[must_use]
    pub fn leader(&self) -> Variant {
        let (a, b) = self.rounded_percentages();
        if a > b { Variant::A } else { Variant::B }
    }
}

/// Estimates `P(A > B)` and `P(B >= A)` by sampling both posteriors.
///
/// Fails only when `sample_count` is zero.
pub fn win_probability<R>(
    a: &Posterior,
    b: &Posterior,
    sample_count: usize,
    rng: &mut R,
) -> Result<WinProbability, InvalidConfigError>
where
    R: Rng + ?Sized,
{
    if sample_count == 0 {
        return Err(InvalidConfigError::ZeroSampleCount);
    }

    let dist_a = a.distribution();
    let dist_b = b.distribution();
    let mut wins_a = 0;
    for _ in 0..sample_count {
        let sample_a = dist_a.sample(rng);
        let sample_b = dist_b.sample(rng);
        if sample_a > sample_b {
            wins_a += 1;
        }
    }
    let result = WinProbability::from_counts(wins_a, sample_count - wins_a);

    tracing::debug!(
        samples = sample_count,
        wins_a = result.wins_a,
        wins_b = result.wins_b,
        "simulated posterior comparison"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn posterior(alpha: f64, beta: f64) -> Posterior {
        Posterior::from_shapes(alpha, beta).unwrap()
    }

    fn reference_pair() -> (Posterior, Posterior) {
        (posterior(121.0, 1181.0), posterior(126.0, 1151.0))
    }

    #[test]
    fn test_reference_scenario_favours_b() {
        let (a, b) = reference_pair();
        let mut rng = Pcg32::seed_from_u64(2024);
        let result = win_probability(&a, &b, DEFAULT_SAMPLE_COUNT, &mut rng).unwrap();
        assert!(result.prob_b > result.prob_a, "{result:?}");
        // analytic value is about 0.68 via the normal approximation
        assert!((result.prob_b - 0.68).abs() < 0.04, "{result:?}");
        assert_eq!(result.leader(), Variant::B);
    }

    #[test]
    fn test_counts_partition_samples() {
        let (a, b) = reference_pair();
        for seed in 0..5 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let result = win_probability(&a, &b, 3_001, &mut rng).unwrap();
            assert_eq!(result.wins_a + result.wins_b, 3_001);
            assert_eq!(result.samples, 3_001);
            assert!((result.prob_a + result.prob_b - 1.0).abs() <= f64::EPSILON);
            assert!((0.0..=1.0).contains(&result.prob_a));
            assert!((0.0..=1.0).contains(&result.prob_b));
        }
    }

    #[test]
    fn test_deterministic_for_seeded_source() {
        let (a, b) = reference_pair();
        let first = win_probability(&a, &b, 5_000, &mut Pcg32::seed_from_u64(99)).unwrap();
        let second = win_probability(&a, &b, 5_000, &mut Pcg32::seed_from_u64(99)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_swapping_variants_mirrors_result() {
        let (a, b) = reference_pair();
        let forward = win_probability(&a, &b, 10_000, &mut Pcg32::seed_from_u64(11)).unwrap();
        let backward = win_probability(&b, &a, 10_000, &mut Pcg32::seed_from_u64(11)).unwrap();
        assert!(
            (forward.prob_a - backward.prob_b).abs() < 0.03,
            "{forward:?} vs {backward:?}"
        );
    }

    #[test]
    fn test_identical_posteriors_are_a_coin_flip() {
        let a = posterior(50.0, 450.0);
        let result = win_probability(&a, &a, 10_000, &mut Pcg32::seed_from_u64(5)).unwrap();
        assert!((result.prob_a - 0.5).abs() < 0.03, "{result:?}");
    }

    #[test]
    fn test_clear_winner() {
        let a = posterior(301.0, 701.0);
        let b = posterior(101.0, 901.0);
        let result = win_probability(&a, &b, 2_000, &mut Pcg32::seed_from_u64(3)).unwrap();
        assert_eq!(result.wins_a, 2_000);
        assert_eq!(result.rounded_percentages(), (100, 0));
        assert_eq!(result.leader(), Variant::A);
    }

    #[test]
    fn test_zero_samples_rejected() {
        let (a, b) = reference_pair();
        let err = win_probability(&a, &b, 0, &mut Pcg32::seed_from_u64(0)).unwrap_err();
        assert_eq!(err, InvalidConfigError::ZeroSampleCount);
    }

    #[test]
    fn test_rounded_tie_goes_to_b() {
        let result = WinProbability::from_counts(5_001, 4_999);
        assert_eq!(result.rounded_percentages(), (50, 50));
        assert_eq!(result.leader(), Variant::B);
    }
}
