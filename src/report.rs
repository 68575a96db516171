use std::{io::Write, path::PathBuf};

use tracing::info;

use crate::{File, Lm, ReportError, Table};

/// Health-infrastructure indicator columns, reported in this order.
pub const HEALTH_INFRASTRUCTURE_INDICATORS: [&str; 6] = [
    "Hospitals per 1,000 Population",
    "Community Health Centers per 1,000 Population",
    "Total beds per 1,000 Population",
    "ICU beds per 1,000 Population",
    "Total Primary Care Practitioners per 1,000 Population",
    "Percentage of Practitioners Needed Met",
];

/// Mortality response columns, reported per indicator in this order.
pub const MORTALITY_RESPONSES: [&str; 2] =
    ["Deaths by 1,000 Population", "Deaths by 1,000 Cases"];

pub const DEFAULT_METRICS_FILE: &str = "all_metrics.csv";

/// Configuration for a report run: the metrics file and the predictor and
/// response columns to pair up.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub path: PathBuf,
    pub predictors: Vec<String>,
    pub responses: Vec<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_METRICS_FILE),
            predictors: HEALTH_INFRASTRUCTURE_INDICATORS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            responses: MORTALITY_RESPONSES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Fit `response ~ predictor` and write a blank line, a one-line header with
/// the F-test p-value, and the full summary block.
pub fn report(
    table: &Table,
    predictor: &str,
    response: &str,
    writer: &mut impl Write,
) -> Result<(), ReportError> {
    let ys = table.column(response)?;
    let xs = table.column(predictor)?;
    let x = faer::mat::from_column_major_slice(xs, xs.len(), 1);
    let lm = Lm::fit(x, ys, Some(&[predictor]))?;
    writeln!(writer)?;
    writeln!(writer, "{} vs {}: {}", response, predictor, lm.f_pvalue())?;
    write!(writer, "{}", lm)?;
    Ok(())
}

/// Load the metrics table once, then report every predictor/response pair in
/// list order. Any failure aborts the run.
pub fn run(config: &ReportConfig, writer: &mut impl Write) -> Result<(), ReportError> {
    let table = File::from_path(&config.path)?.read()?;
    info!(
        "read table with {} rows and {} columns from {}",
        table.nrows(),
        table.ncols(),
        config.path.display()
    );
    for predictor in &config.predictors {
        for response in &config.responses {
            report(&table, predictor, response, writer)?;
        }
    }
    Ok(())
}
