use std::path::PathBuf;

use abayes_analysis::{
    config::{AnalysisSettings, VisConfig},
    dataset::QueryResponse,
    seed::SimulationSeed,
};
use anyhow::Context;
use rand::Rng as _;

use crate::util;

/// Input and analysis options shared by every subcommand.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct AnalysisOptions {
    /// Query response JSON file (field schema plus result rows)
    query: PathBuf,
    /// JSON file with analysis options (camelCase keys)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Alpha shape of the Beta prior
    #[arg(long)]
    alpha_prior: Option<f64>,
    /// Beta shape of the Beta prior
    #[arg(long)]
    beta_prior: Option<f64>,
    /// Credible interval percentage, in (0, 100]
    #[arg(long)]
    credible_interval: Option<f64>,
    /// Number of Monte Carlo samples
    #[arg(long)]
    samples: Option<usize>,
    /// Density grid step over [0, 1]
    #[arg(long)]
    resolution: Option<f64>,
    /// Minimum density for the plot range (default: relative to the lowest peak)
    #[arg(long)]
    min_density: Option<f64>,
    /// Simulation seed as 32 hex digits (default: random)
    #[arg(long)]
    seed: Option<SimulationSeed>,
}

#[derive(Debug, Clone)]
pub(crate) struct LoadedInput {
    pub(crate) response: QueryResponse,
    pub(crate) settings: AnalysisSettings,
    pub(crate) seed: SimulationSeed,
}

impl AnalysisOptions {
    fn overrides(&self) -> VisConfig {
        VisConfig {
            alpha_prior: self.alpha_prior,
            beta_prior: self.beta_prior,
            credible_interval_percent: self.credible_interval,
            sample_count: self.samples,
            resolution: self.resolution,
            min_density: self.min_density,
        }
    }

    pub(crate) fn load(&self) -> anyhow::Result<LoadedInput> {
        let file_config = match &self.config {
            Some(path) => util::read_config_file(path)?,
            None => VisConfig::default(),
        };
        let config = file_config.merge(self.overrides());
        let settings = config
            .settings()
            .context("Invalid analysis configuration")?;

        let response = util::read_query_file(&self.query)?;
        tracing::debug!(
            path = %self.query.display(),
            rows = response.data.len(),
            "loaded query response"
        );

        let seed = self.seed.unwrap_or_else(|| rand::rng().random());
        Ok(LoadedInput {
            response,
            settings,
            seed,
        })
    }
}
