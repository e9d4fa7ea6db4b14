use std::{io::Write, path::PathBuf};

use abayes_analysis::report::{AbTestReport, SeriesReport};
use anyhow::Context;
use serde::Serialize;

use super::options::AnalysisOptions;
use crate::util::Output;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct DensityArg {
    #[clap(flatten)]
    options: AnalysisOptions,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &DensityArg) -> anyhow::Result<()> {
    let input = arg.options.load()?;
    let report = AbTestReport::analyze(&input.response, &input.settings, input.seed)
        .context("Failed to analyze A/B test")?;

    Output::create(arg.output.as_deref())?.emit("density CSV", |w| Ok(write_csv(w, &report)?))
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    series: &'a str,
    x: f64,
    y: f64,
}

/// Writes `series,x,y` rows; series are named `pdf:<label>` and `cdf:<label>`.
fn write_csv(w: &mut dyn Write, report: &AbTestReport) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(w);
    let plot = &report.plot;
    for (kind, list) in [("pdf", &plot.pdf), ("cdf", &plot.cdf)] {
        for SeriesReport { label, points } in list {
            let series = format!("{kind}:{label}");
            for &(x, y) in points {
                writer.serialize(CsvRow {
                    series: &series,
                    x,
                    y,
                })?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use abayes_analysis::{config::AnalysisSettings, dataset::QueryResponse, seed::SimulationSeed};

    use super::*;

    #[test]
    fn test_csv_rows() {
        let response: QueryResponse = serde_json::from_str(
            r#"{
                "fields": {
                    "dimensions": [{"name": "v", "type": "string"}],
                    "measures": [{"name": "n", "type": "number"}, {"name": "c", "type": "number"}]
                },
                "data": [
                    {"v": {"value": "A"}, "n": {"value": 1300}, "c": {"value": 120}},
                    {"v": {"value": "B, new"}, "n": {"value": 1275}, "c": {"value": 125}}
                ]
            }"#,
        )
        .unwrap();
        let report = AbTestReport::analyze(
            &response,
            &AnalysisSettings::default(),
            SimulationSeed::from_u128(0),
        )
        .unwrap();

        let mut buf = Vec::new();
        write_csv(&mut buf, &report).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "series,x,y");
        assert_eq!(lines[1], "pdf:A,0.0,0.0");
        // 19 drawn pdf points and 16 cdf points per variant
        assert_eq!(lines.len(), 1 + 2 * 19 + 2 * 16);
        assert!(lines.iter().any(|l| l.starts_with("\"cdf:B, new\",15")));
    }
}
