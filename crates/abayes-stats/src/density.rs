//! Density sampling of posterior distributions for plotting.
//!
//! The sampler evaluates posterior densities on a regular grid over `[0, 1]`
//! and reports the coordinates on the percentage scale, together with hints a
//! chart needs to scale its axes:
//!
//! - `max_y`: the largest density value across all series
//! - `max_x`: the largest x (percentage) where any density still exceeds the
//!   minimum plotting threshold
//!
//! Conversion-rate posteriors are usually concentrated in a small part of the
//! unit interval, so `max_x` lets the caller truncate the plotted domain. The
//! plotted range is typically extended by [`DRAW_MARGIN`] to keep the curves
//! centred.
//!
//! # Thresholds
//!
//! An explicit minimum density can be configured. Without one, the threshold
//! is [`RELATIVE_MIN_DENSITY`] times the smallest per-series peak density, so
//! that the range always covers every series' bulk.
//!
//! # No plottable range
//!
//! If the threshold eliminates every grid point, `max_x` is
//! [`NO_PLOTTABLE_RANGE`] (`-1.0`). Consumers should fall back to the full
//! domain; [`DensitySampling::draw_max_x`] does this.
//!
//! # Examples
//!
//! ```
//! use abayes_stats::{density::DensitySampler, posterior::Posterior};
//!
//! let a = Posterior::from_shapes(121.0, 1181.0).unwrap();
//! let b = Posterior::from_shapes(126.0, 1151.0).unwrap();
//!
//! let sampler = DensitySampler::default();
//! let sampling = sampler.density_series(&[a, b]);
//! assert_eq!(sampling.series.len(), 2);
//! assert!(sampling.max_y > 40.0);
//! assert!(sampling.max_x > 10.0 && sampling.max_x < 25.0);
//!
//! let cdf = sampler.cumulative_series(&[a, b], sampling.max_x);
//! let (_, last) = *cdf[0].points.last().unwrap();
//! assert!(last > 99.0);
//! ```

use crate::{error::InvalidConfigError, posterior::Posterior};

/// Default grid step over `[0, 1]`.
pub const DEFAULT_RESOLUTION: f64 = 0.01;

/// Threshold factor applied to the smallest series peak when no explicit
/// minimum density is configured.
pub const RELATIVE_MIN_DENSITY: f64 = 1e-7;

/// Factor by which `max_x` is extended to obtain the drawn domain.
pub const DRAW_MARGIN: f64 = 1.25;

/// Sentinel `max_x` meaning that no grid point passed the threshold.
pub const NO_PLOTTABLE_RANGE: f64 = -1.0;

/// Upper end of the domain on the percentage scale.
const FULL_DOMAIN_PERCENT: f64 = 100.0;

/// An ordered sequence of `(x, y)` points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DensitySeries {
    pub points: Vec<(f64, f64)>,
}

impl DensitySeries {
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points.iter().copied()
    }

    /// Largest `y` in the series, or `None` if it is empty.
    #[must_use]
    pub fn max_y(&self) -> Option<f64> {
        self.iter().map(|(_, y)| y).max_by(f64::total_cmp)
    }

    /// Keeps only the points with `x < x_limit`.
    #[must_use]
    pub fn truncated(&self, x_limit: f64) -> Self {
        Self {
            points: self.iter().filter(|&(x, _)| x < x_limit).collect(),
        }
    }
}

/// Density series of several posteriors plus axis-scaling hints.
#[derive(Debug, Clone, PartialEq)]
pub struct DensitySampling {
    /// One series per posterior, in input order, with `(x * 100, pdf(x))` points.
    pub series: Vec<DensitySeries>,
    /// Largest density across all series (`0.0` when there are no points).
    pub max_y: f64,
    /// Largest x (percentage) with density above the threshold, or
    /// [`NO_PLOTTABLE_RANGE`].
    pub max_x: f64,
    /// The threshold that was applied.
    pub threshold: f64,
}

impl DensitySampling {
    /// Returns `false` when the threshold eliminated every point.
    #[must_use]
    pub fn has_plottable_range(&self) -> bool {
        self.max_x >= 0.0
    }

    /// Upper end of the domain to draw, on the percentage scale.
    ///
    /// This is `max_x * DRAW_MARGIN`, capped at 100, or the full domain when
    /// there is no plottable range.
    #[must_use]
    pub fn draw_max_x(&self) -> f64 {
        if self.has_plottable_range() {
            (self.max_x * DRAW_MARGIN).min(FULL_DOMAIN_PERCENT)
        } else {
            FULL_DOMAIN_PERCENT
        }
    }

    /// Series truncated to `x < draw_max_x()`.
    ///
    /// With no plottable range the series are returned whole.
    #[must_use]
    pub fn draw_series(&self) -> Vec<DensitySeries> {
        if !self.has_plottable_range() {
            return self.series.clone();
        }
        let limit = self.draw_max_x();
        self.series.iter().map(|s| s.truncated(limit)).collect()
    }
}

/// Evaluates posterior PDFs and CDFs over a regular grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DensitySampler {
    resolution: f64,
    min_density: Option<f64>,
}

impl Default for DensitySampler {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            min_density: None,
        }
    }
}

impl DensitySampler {
    /// Creates a sampler with the given grid step over `[0, 1]`.
    pub fn new(resolution: f64) -> Result<Self, InvalidConfigError> {
        if !(resolution.is_finite() && resolution > 0.0 && resolution <= 1.0) {
            return Err(InvalidConfigError::InvalidResolution { resolution });
        }
        Ok(Self {
            resolution,
            min_density: None,
        })
    }

    /// Sets an explicit minimum plotting density.
    ///
    /// `None` selects the relative default threshold.
    pub fn with_min_density(mut self, min_density: Option<f64>) -> Result<Self, InvalidConfigError> {
        if let Some(value) = min_density.filter(|v| !(v.is_finite() && *v >= 0.0)) {
            return Err(InvalidConfigError::InvalidMinDensity { value });
        }
        self.min_density = min_density;
        Ok(self)
    }

    #[must_use]
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    #[must_use]
    pub fn min_density(&self) -> Option<f64> {
        self.min_density
    }

    /// Grid points `i * resolution` for `i = 0, 1, ...` up to and including
    /// `upper` (a fraction in `[0, 1]`).
    ///
    /// Points are computed from the index rather than by accumulating steps,
    /// so the grid does not drift.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn grid(&self, upper: f64) -> impl Iterator<Item = f64> + use<> {
        let upper = upper.clamp(0.0, 1.0);
        let step = self.resolution;
        // tolerate representation error so that e.g. 1.0 / 0.01 yields 100 steps
        let count = (upper / step + 1e-9).floor() as usize;
        (0..=count).map(move |i| (i as f64 * step).min(upper))
    }

    /// Samples the PDF of every posterior over `[0, 1]`.
    ///
    /// Grid points where a density is not finite (the boundaries of a
    /// posterior with a shape parameter below 1) are left out of that series.
    #[must_use]
    pub fn density_series(&self, posteriors: &[Posterior]) -> DensitySampling {
        let series = posteriors
            .iter()
            .map(|posterior| {
                let dist = posterior.distribution();
                let points = self
                    .grid(1.0)
                    .map(|x| (x * 100.0, dist.pdf(x)))
                    .filter(|(_, y)| y.is_finite())
                    .collect();
                DensitySeries { points }
            })
            .collect::<Vec<_>>();

        let max_y = series
            .iter()
            .filter_map(DensitySeries::max_y)
            .fold(0.0, f64::max);

        let threshold = self
            .min_density
            .unwrap_or_else(|| relative_threshold(&series));

        let max_x = series
            .iter()
            .flat_map(DensitySeries::iter)
            .filter(|&(_, y)| y > threshold)
            .map(|(x, _)| x)
            .fold(NO_PLOTTABLE_RANGE, f64::max);

        if max_x < 0.0 {
            tracing::warn!(threshold, "no grid point exceeds the minimum density");
        }
        tracing::debug!(
            series = series.len(),
            max_y,
            max_x,
            threshold,
            "sampled posterior densities"
        );

        DensitySampling {
            series,
            max_y,
            max_x,
            threshold,
        }
    }

    /// Samples the CDF of every posterior over `[0, domain_max / 100]`.
    ///
    /// `domain_max` is on the percentage scale, typically
    /// [`DensitySampling::max_x`]. The sentinel [`NO_PLOTTABLE_RANGE`] (or any
    /// negative or non-finite value) selects the full domain. Points are
    /// `(x * 100, cdf(x) * 100)`.
    #[must_use]
    pub fn cumulative_series(&self, posteriors: &[Posterior], domain_max: f64) -> Vec<DensitySeries> {
        let upper = if domain_max.is_finite() && domain_max >= 0.0 {
            (domain_max / 100.0).min(1.0)
        } else {
            1.0
        };
        posteriors
            .iter()
            .map(|posterior| {
                let dist = posterior.distribution();
                let points = self
                    .grid(upper)
                    .map(|x| (x * 100.0, dist.cdf(x) * 100.0))
                    .collect();
                DensitySeries { points }
            })
            .collect()
    }
}

/// Relative threshold: a tiny fraction of the smallest per-series peak.
///
/// Peaks are taken over strictly positive densities; series without any are
/// ignored. With no positive density at all the threshold is zero.
fn relative_threshold(series: &[DensitySeries]) -> f64 {
    series
        .iter()
        .filter_map(|s| {
            s.iter()
                .map(|(_, y)| y)
                .filter(|&y| y > 0.0)
                .max_by(f64::total_cmp)
        })
        .min_by(f64::total_cmp)
        .map_or(0.0, |peak| peak * RELATIVE_MIN_DENSITY)
}
