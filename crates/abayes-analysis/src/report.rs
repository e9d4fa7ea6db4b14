//! The complete A/B analysis of a query response.
//!
//! [`AbTestReport::analyze`] runs the whole pipeline:
//!
//! 1. resolve the variant, visitor and conversion fields from the schema
//! 2. read variants A and B from the first two rows
//! 3. derive both posteriors from the configured prior
//! 4. compute each variant's credible interval
//! 5. estimate the win probability with a generator seeded from the
//!    [`SimulationSeed`]
//! 6. sample PDF and CDF series plus axis hints for plotting
//!
//! The report is serializable and records the seed, so the same query,
//! settings and seed always produce the same report.

use abayes_stats::{
    credible::{self, CredibleInterval},
    density::DensitySeries,
    posterior::{self, Posterior, VariantObservation},
    win_probability,
};
use serde::{Deserialize, Serialize};

use crate::{
    config::AnalysisSettings,
    dataset::{self, QueryResponse},
    error::AnalysisError,
    schema::{self, ResolvedFields},
    seed::SimulationSeed,
    statement,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbTestReport {
    pub fields: ResolvedFields,
    pub prior: ShapeSummary,
    pub credible_interval_percent: f64,
    pub variants: [VariantReport; 2],
    pub comparison: ComparisonReport,
    pub plot: PlotReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeSummary {
    pub alpha: f64,
    pub beta: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PosteriorSummary {
    pub alpha: f64,
    pub beta: f64,
    pub mean: f64,
    /// Only defined when both shapes exceed 1.
    pub mode: Option<f64>,
    pub variance: f64,
}

impl From<&Posterior> for PosteriorSummary {
    fn from(posterior: &Posterior) -> Self {
        let dist = posterior.distribution();
        Self {
            alpha: dist.alpha(),
            beta: dist.beta(),
            mean: dist.mean(),
            mode: dist.mode(),
            variance: dist.variance(),
        }
    }
}

/// Credible interval bounds in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntervalSummary {
    pub lower: f64,
    pub upper: f64,
}

impl From<CredibleInterval> for IntervalSummary {
    fn from(interval: CredibleInterval) -> Self {
        Self {
            lower: interval.lower,
            upper: interval.upper,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantReport {
    pub label: String,
    pub visitors: u64,
    pub conversions: u64,
    pub raw_rate: Option<f64>,
    pub posterior: PosteriorSummary,
    pub credible_interval: IntervalSummary,
    pub statement: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub prob_a: f64,
    pub prob_b: f64,
    pub samples: usize,
    pub seed: SimulationSeed,
    pub statement: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesReport {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

/// Plot data on the percentage scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotReport {
    pub resolution: f64,
    pub threshold: f64,
    pub max_y: f64,
    /// `-1` when no grid point exceeds the threshold.
    pub max_x: f64,
    pub draw_max_x: f64,
    /// PDF series truncated to the drawn domain.
    pub pdf: Vec<SeriesReport>,
    /// CDF series over `[0, max_x]`, in percent.
    pub cdf: Vec<SeriesReport>,
}

impl AbTestReport {
    /// Analyzes the first two rows of `response`.
    pub fn analyze(
        response: &QueryResponse,
        settings: &AnalysisSettings,
        seed: SimulationSeed,
    ) -> Result<Self, AnalysisError> {
        let fields = schema::resolve_fields(&response.fields)?;
        let (obs_a, obs_b) = dataset::extract_observations(&response.data, &fields)?;
        let (post_a, post_b) = posterior::derive_posteriors(&settings.prior, &obs_a, &obs_b)?;

        let percent = settings.credible_interval_percent;
        let interval_a = credible::credible_interval(&post_a, percent)?;
        let interval_b = credible::credible_interval(&post_b, percent)?;

        let mut rng = seed.rng();
        let win = win_probability::win_probability(&post_a, &post_b, settings.sample_count, &mut rng)?;

        let sampler = &settings.sampler;
        let posteriors = [post_a, post_b];
        let sampling = sampler.density_series(&posteriors);
        let cdf = sampler.cumulative_series(&posteriors, sampling.max_x);

        let labels = [obs_a.label.as_str(), obs_b.label.as_str()];
        let series = |series: Vec<DensitySeries>| -> Vec<SeriesReport> {
            labels
                .iter()
                .zip(series)
                .map(|(label, s)| SeriesReport {
                    label: (*label).to_owned(),
                    points: s.points,
                })
                .collect()
        };

        let comparison = ComparisonReport {
            prob_a: win.prob_a,
            prob_b: win.prob_b,
            samples: win.samples,
            seed,
            statement: statement::win_statement(labels[0], labels[1], &win),
        };
        let plot = PlotReport {
            resolution: sampler.resolution(),
            threshold: sampling.threshold,
            max_y: sampling.max_y,
            max_x: sampling.max_x,
            draw_max_x: sampling.draw_max_x(),
            pdf: series(sampling.draw_series()),
            cdf: series(cdf),
        };
        let variants = [
            variant_report(obs_a, &post_a, interval_a, percent),
            variant_report(obs_b, &post_b, interval_b, percent),
        ];

        tracing::info!(
            a = %variants[0].label,
            b = %variants[1].label,
            prob_a = comparison.prob_a,
            prob_b = comparison.prob_b,
            %seed,
            "analyzed A/B test"
        );

        Ok(Self {
            fields,
            prior: ShapeSummary {
                alpha: settings.prior.alpha(),
                beta: settings.prior.beta(),
            },
            credible_interval_percent: percent,
            variants,
            comparison,
            plot,
        })
    }
}

fn variant_report(
    observation: VariantObservation,
    posterior: &Posterior,
    interval: CredibleInterval,
    percent: f64,
) -> VariantReport {
    let raw_rate = observation.raw_rate();
    let statement = statement::interval_statement(percent, &observation.label, &interval);
    VariantReport {
        label: observation.label,
        visitors: observation.visitors,
        conversions: observation.conversions,
        raw_rate,
        posterior: posterior.into(),
        credible_interval: interval.into(),
        statement,
    }
}

#[cfg(test)]
mod tests {
    use abayes_stats::error::InvalidInputError;
    use serde_json::json;

    use super::*;
    use crate::config::VisConfig;

    fn response(rows: serde_json::Value) -> QueryResponse {
        serde_json::from_value(json!({
            "fields": {
                "dimensions": [{"name": "ab.variant", "type": "string"}],
                "measures": [
                    {"name": "ab.visitors", "type": "number"},
                    {"name": "ab.conversions", "type": "number"}
                ]
            },
            "data": rows
        }))
        .unwrap()
    }

    fn reference_response() -> QueryResponse {
        response(json!([
            {"ab.variant": {"value": "Variant A"}, "ab.visitors": {"value": 1300}, "ab.conversions": {"value": 120}},
            {"ab.variant": {"value": "Variant B"}, "ab.visitors": {"value": 1275}, "ab.conversions": {"value": 125}}
        ]))
    }

    fn seed() -> SimulationSeed {
        SimulationSeed::from_u128(0x5eed)
    }

    #[test]
    fn test_reference_report() {
        let report =
            AbTestReport::analyze(&reference_response(), &AnalysisSettings::default(), seed())
                .unwrap();

        let [a, b] = &report.variants;
        assert_eq!(a.posterior.alpha, 121.0);
        assert_eq!(a.posterior.beta, 1181.0);
        assert_eq!(b.posterior.alpha, 126.0);
        assert_eq!(b.posterior.beta, 1151.0);
        assert!((a.raw_rate.unwrap() - 120.0 / 1300.0).abs() < 1e-12);
        assert!(a.credible_interval.lower < 9.23 && 9.23 < a.credible_interval.upper);
        assert!(a.statement.starts_with("95% probability 'Variant A' conversion is in range ["));

        assert!(report.comparison.prob_b > report.comparison.prob_a);
        assert_eq!(report.comparison.samples, 10_000);
        assert!(
            report
                .comparison
                .statement
                .ends_with("chance that Variant B converts better than Variant A.")
        );

        assert!((report.plot.max_x - 15.0).abs() < 1e-9);
        assert!((report.plot.draw_max_x - 18.75).abs() < 1e-9);
        assert_eq!(report.plot.pdf.len(), 2);
        assert_eq!(report.plot.pdf[1].label, "Variant B");
        assert!(report.plot.pdf.iter().all(|s| s.points.len() == 19));
        assert!(report.plot.cdf.iter().all(|s| s.points.len() == 16));
    }

    #[test]
    fn test_same_seed_same_report() {
        let settings = AnalysisSettings::default();
        let first = AbTestReport::analyze(&reference_response(), &settings, seed()).unwrap();
        let second = AbTestReport::analyze(&reference_response(), &settings, seed()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_settings_flow_through() {
        let settings = VisConfig {
            alpha_prior: Some(2.0),
            beta_prior: Some(20.0),
            credible_interval_percent: Some(80.0),
            sample_count: Some(1_000),
            ..VisConfig::default()
        }
        .settings()
        .unwrap();
        let report = AbTestReport::analyze(&reference_response(), &settings, seed()).unwrap();
        assert_eq!(report.prior, ShapeSummary { alpha: 2.0, beta: 20.0 });
        assert_eq!(report.variants[0].posterior.alpha, 122.0);
        assert_eq!(report.variants[0].posterior.beta, 1200.0);
        assert_eq!(report.comparison.samples, 1_000);
        assert!(report.variants[1].statement.starts_with("80% probability"));
    }

    #[test]
    fn test_invalid_counts_fail_the_whole_analysis() {
        let response = response(json!([
            {"ab.variant": {"value": "A"}, "ab.visitors": {"value": 10}, "ab.conversions": {"value": 20}},
            {"ab.variant": {"value": "B"}, "ab.visitors": {"value": 10}, "ab.conversions": {"value": 2}}
        ]));
        let err = AbTestReport::analyze(&response, &AnalysisSettings::default(), seed())
            .unwrap_err();
        assert_eq!(
            err,
            AnalysisError::Input(InvalidInputError::ConversionsExceedVisitors {
                label: "A".to_owned(),
                visitors: 10,
                conversions: 20,
            })
        );
    }

    #[test]
    fn test_oversized_counts_are_rejected() {
        let response = response(json!([
            {"ab.variant": {"value": "A"}, "ab.visitors": {"value": 10_000_000_000_000_000_u64}, "ab.conversions": {"value": 1_000_000_000_000_000_u64}},
            {"ab.variant": {"value": "B"}, "ab.visitors": {"value": "18446744073709551615"}, "ab.conversions": {"value": 2}}
        ]));
        let err = AbTestReport::analyze(&response, &AnalysisSettings::default(), seed())
            .unwrap_err();
        assert_eq!(
            err,
            AnalysisError::Input(InvalidInputError::CountTooLarge {
                label: "A".to_owned(),
                visitors: 10_000_000_000_000_000,
            })
        );
    }

    #[test]
    fn test_unresolvable_schema() {
        let mut response = reference_response();
        response.fields.measures.clear();
        let err = AbTestReport::analyze(&response, &AnalysisSettings::default(), seed())
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Schema(_)), "{err}");
    }

    #[test]
    fn test_report_serializes_seed_and_fields() {
        let report =
            AbTestReport::analyze(&reference_response(), &AnalysisSettings::default(), seed())
                .unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["comparison"]["seed"], "00000000000000000000000000005eed");
        assert_eq!(json["fields"]["visitors"], "ab.visitors");
        let back: AbTestReport = serde_json::from_value(json).unwrap();
        assert_eq!(back.comparison.seed, report.comparison.seed);
        assert_eq!(back.variants[1].statement, report.variants[1].statement);
    }
}
