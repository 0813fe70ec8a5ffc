//! Output formatting for evaluation reports.
//!
//! Supports both human-readable terminal output and JSON for scripting.

use kwseval_core::evaluation::{BootstrapResult, Statistic};
use serde::Serialize;

/// Decimal places in human-readable output
const REPORT_PRECISION: usize = 4;

/// One reported statistic, with its confidence interval if bootstrapped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticReport {
    pub name: &'static str,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper: Option<f64>,
}

impl StatisticReport {
    /// Report for a statistic computed without resampling.
    pub fn point(statistic: Statistic, value: f64) -> Self {
        Self {
            name: statistic.name(),
            value,
            lower: None,
            upper: None,
        }
    }

    /// Report for a bootstrapped statistic.
    pub fn interval(statistic: Statistic, result: BootstrapResult) -> Self {
        Self {
            name: statistic.name(),
            value: result.observed,
            lower: Some(result.lower),
            upper: Some(result.upper),
        }
    }
}

/// Summary of the run accompanying the statistics in JSON output
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub location: String,
    pub scorer: &'static str,
    pub references: usize,
    pub hypotheses: usize,
    pub effective_hypotheses: usize,
    pub repeated_matches: usize,
    pub groups: usize,
}

/// JSON output structure for an evaluation
#[derive(Serialize)]
pub struct JsonOutput<'a> {
    #[serde(flatten)]
    pub summary: &'a RunSummary,
    pub statistics: &'a [StatisticReport],
}

/// Formats statistics one per line, as `name = value [lower, upper]`.
pub fn format_human(reports: &[StatisticReport]) -> String {
    reports
        .iter()
        .map(|report| match (report.lower, report.upper) {
            (Some(lower), Some(upper)) => format!(
                "{} = {:.prec$} [{:.prec$}, {:.prec$}]",
                report.name,
                report.value,
                lower,
                upper,
                prec = REPORT_PRECISION
            ),
            _ => format!(
                "{} = {:.prec$}",
                report.name,
                report.value,
                prec = REPORT_PRECISION
            ),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Formats the run summary and statistics as pretty-printed JSON.
pub fn format_json(summary: &RunSummary, reports: &[StatisticReport]) -> String {
    let output = JsonOutput {
        summary,
        statistics: reports,
    };
    serde_json::to_string_pretty(&output).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}
