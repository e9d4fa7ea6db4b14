use std::{io::Write, path::PathBuf};

use abayes_analysis::report::{AbTestReport, VariantReport};
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::options::AnalysisOptions;
use crate::util::{self, Output};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct AnalyzeArg {
    #[clap(flatten)]
    options: AnalysisOptions,
    /// Report format (text or json)
    #[arg(long, default_value = "text")]
    format: OutputFormat,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ReportFile<'a> {
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    report: &'a AbTestReport,
}

pub(crate) fn run(arg: &AnalyzeArg) -> anyhow::Result<()> {
    let input = arg.options.load()?;
    let report = AbTestReport::analyze(&input.response, &input.settings, input.seed)
        .context("Failed to analyze A/B test")?;

    let mut output = Output::create(arg.output.as_deref())?;
    match arg.format {
        OutputFormat::Json => output.emit("JSON report", |w| {
            let file = ReportFile {
                generated_at: Utc::now(),
                report: &report,
            };
            util::write_json(w, &file)
        }),
        OutputFormat::Text => output.emit("text report", |w| Ok(write_text(w, &report)?)),
    }
}

fn write_text(w: &mut dyn Write, report: &AbTestReport) -> std::io::Result<()> {
    let fields = &report.fields;
    writeln!(
        w,
        "Fields: variant={}, visitors={}, conversions={}",
        fields.variant, fields.visitors, fields.conversions
    )?;
    writeln!(
        w,
        "Prior: Beta({}, {})",
        report.prior.alpha, report.prior.beta
    )?;
    for variant in &report.variants {
        writeln!(w)?;
        write_variant(w, variant)?;
    }

    let comparison = &report.comparison;
    writeln!(w)?;
    writeln!(w, "{}", comparison.statement)?;
    writeln!(
        w,
        "  P(A > B) = {:.4}, P(B >= A) = {:.4} ({} samples, seed {})",
        comparison.prob_a, comparison.prob_b, comparison.samples, comparison.seed
    )?;

    let plot = &report.plot;
    writeln!(w)?;
    if plot.max_x < 0.0 {
        writeln!(
            w,
            "Plot range: no density above {:e}; showing the full range",
            plot.threshold
        )?;
    } else {
        writeln!(
            w,
            "Plot range: 0% to {:.2}% (densities vanish after {:.2}%), peak density {:.2}",
            plot.draw_max_x, plot.max_x, plot.max_y
        )?;
    }
    Ok(())
}

fn write_variant(w: &mut dyn Write, variant: &VariantReport) -> std::io::Result<()> {
    let rate = variant
        .raw_rate
        .map_or_else(|| "n/a".to_owned(), |r| format!("{:.2}%", r * 100.0));
    writeln!(
        w,
        "{}: {} conversions / {} visitors ({rate})",
        variant.label, variant.conversions, variant.visitors
    )?;
    let posterior = &variant.posterior;
    write!(
        w,
        "  posterior Beta({}, {}), mean {:.2}%",
        posterior.alpha,
        posterior.beta,
        posterior.mean * 100.0
    )?;
    if let Some(mode) = posterior.mode {
        write!(w, ", mode {:.2}%", mode * 100.0)?;
    }
    writeln!(w, ", sd {:.2}%", posterior.variance.sqrt() * 100.0)?;
    writeln!(w, "  {}", variant.statement)
}
