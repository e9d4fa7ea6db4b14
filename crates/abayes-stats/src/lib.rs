//! Bayesian statistics for two-variant conversion tests.
//!
//! This crate implements the numeric core of a Bayesian A/B test:
//!
//! - **Posterior estimation**: Beta-Binomial conjugate update of a Beta prior
//! - **Credible intervals**: equal-tailed, quantile-based bounds on the
//!   conversion rate
//! - **Density sampling**: PDF/CDF series and axis hints for plotting
//! - **Win probability**: Monte Carlo estimate of `P(A > B)`
//!
//! Every operation is a pure computation over its arguments. The only source
//! of randomness is the generator passed to
//! [`win_probability::win_probability`].
//!
//! # Modules
//!
//! - [`beta`]: Beta distribution (density, CDF, quantiles, sampling)
//! - [`posterior`]: priors, observations and posterior derivation
//! - [`credible`]: credible-interval calculation
//! - [`density`]: density and cumulative series for plotting
//! - [`win_probability`]: Monte Carlo comparison of two posteriors
//! - [`error`]: input and configuration errors
//!
//! # Examples
//!
//! ```
//! use abayes_stats::{
//!     credible::credible_interval,
//!     posterior::{Prior, VariantObservation, derive_posteriors},
//!     win_probability::win_probability,
//! };
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg32;
//!
//! let a = VariantObservation::new("Variant A", 1300, 120);
//! let b = VariantObservation::new("Variant B", 1275, 125);
//! let (post_a, post_b) = derive_posteriors(&Prior::default(), &a, &b).unwrap();
//!
//! let interval = credible_interval(&post_a, 95.0).unwrap();
//! assert!(interval.lower <= interval.upper);
//!
//! let mut rng = Pcg32::seed_from_u64(42);
//! let result = win_probability(&post_a, &post_b, 10_000, &mut rng).unwrap();
//! assert_eq!(result.wins_a + result.wins_b, 10_000);
//! ```

pub mod beta;
pub mod credible;
pub mod density;
pub mod error;
pub mod posterior;
pub mod win_probability;
