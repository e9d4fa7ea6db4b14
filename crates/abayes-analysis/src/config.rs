//! User-facing analysis options.
//!
//! [`VisConfig`] mirrors the option object a dashboard host passes in, with
//! camelCase keys. Every option is optional; a missing, `null` or zero value
//! means "use the default", matching hosts that treat falsy options as unset.
//! [`VisConfig::settings`] validates the options and resolves the defaults.
//!
//! | Key                       | Default                                   |
//! |---------------------------|-------------------------------------------|
//! | `alphaPrior`              | `1`                                       |
//! | `betaPrior`               | `1`                                       |
//! | `credibleIntervalPercent` | [`DEFAULT_CREDIBLE_INTERVAL_PERCENT`]     |
//! | `sampleCount`             | [`DEFAULT_SAMPLE_COUNT`]                  |
//! | `resolution`              | [`DEFAULT_RESOLUTION`]                    |
//! | `minDensity`              | relative to the smallest density peak     |

use abayes_stats::{
    credible::{self, DEFAULT_CREDIBLE_INTERVAL_PERCENT},
    density::{DEFAULT_RESOLUTION, DensitySampler},
    error::InvalidConfigError,
    posterior::Prior,
    win_probability::DEFAULT_SAMPLE_COUNT,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha_prior: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beta_prior: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credible_interval_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_density: Option<f64>,
}

/// Validated options with every default resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisSettings {
    pub prior: Prior,
    pub credible_interval_percent: f64,
    pub sample_count: usize,
    pub sampler: DensitySampler,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            prior: Prior::default(),
            credible_interval_percent: DEFAULT_CREDIBLE_INTERVAL_PERCENT,
            sample_count: DEFAULT_SAMPLE_COUNT,
            sampler: DensitySampler::default(),
        }
    }
}

fn set(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

impl VisConfig {
    /// Options from `overrides` take precedence over `self`.
    ///
    /// Falsy overrides do not mask a value set in `self`.
    #[must_use]
    pub fn merge(self, overrides: Self) -> Self {
        Self {
            alpha_prior: set(overrides.alpha_prior).or(self.alpha_prior),
            beta_prior: set(overrides.beta_prior).or(self.beta_prior),
            credible_interval_percent: set(overrides.credible_interval_percent)
                .or(self.credible_interval_percent),
            sample_count: overrides
                .sample_count
                .filter(|n| *n != 0)
                .or(self.sample_count),
            resolution: set(overrides.resolution).or(self.resolution),
            min_density: set(overrides.min_density).or(self.min_density),
        }
    }

    /// Validates the options and fills in defaults.
    pub fn settings(&self) -> Result<AnalysisSettings, InvalidConfigError> {
        let prior = Prior::new(
            set(self.alpha_prior).unwrap_or(Prior::UNIFORM.alpha()),
            set(self.beta_prior).unwrap_or(Prior::UNIFORM.beta()),
        )?;

        let credible_interval_percent =
            set(self.credible_interval_percent).unwrap_or(DEFAULT_CREDIBLE_INTERVAL_PERCENT);
        credible::validate_percent(credible_interval_percent)?;

        let sample_count = self
            .sample_count
            .filter(|n| *n != 0)
            .unwrap_or(DEFAULT_SAMPLE_COUNT);

        let sampler = DensitySampler::new(set(self.resolution).unwrap_or(DEFAULT_RESOLUTION))?
            .with_min_density(set(self.min_density))?;

        let settings = AnalysisSettings {
            prior,
            credible_interval_percent,
            sample_count,
            sampler,
        };
        tracing::debug!(?settings, "resolved analysis settings");
        Ok(settings)
    }
}
