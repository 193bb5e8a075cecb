//! JSON output formatter for machine processing

use crate::domain::{ProjectReport, ReportSummary};
use crate::orchestrator::RunResult;
use crate::output::OutputFormatter;
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
#[derive(Debug, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

/// JSON representation of the full result
#[derive(Serialize)]
struct JsonOutput<'a> {
    summary: &'a ReportSummary,
    projects: &'a [ProjectReport],
    /// Projects that could not be analysed
    #[serde(skip_serializing_if = "Vec::is_empty")]
    failures: Vec<String>,
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, result: &RunResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let output = JsonOutput {
            summary: &result.summary,
            projects: &result.reports,
            failures: result.failures.iter().map(|e| e.to_string()).collect(),
        };

        serde_json::to_writer_pretty(&mut *writer, &output)?;
        writeln!(writer)
    }
}
