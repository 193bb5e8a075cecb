//! Output formatting for run results
//!
//! This module provides:
//! - Text output: an indented dependency tree with colored severities
//! - JSON output for machine processing

mod json;
mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::cli::OutputFormat;
use crate::config::OutdatedOptions;
use crate::orchestrator::RunResult;
use std::fs::File;
use std::io::{self, BufWriter, Write};

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format and write the whole run result
    fn format(&self, result: &RunResult, writer: &mut dyn Write) -> io::Result<()>;
}

/// Create an output formatter for the chosen format
pub fn create_formatter(format: OutputFormat, color: bool) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::with_color(color)),
        OutputFormat::Json => Box::new(JsonFormatter::new()),
    }
}

/// Write a run result to stdout, or to the file named by `--output`
///
/// Colors are only used on stdout.
pub fn write_result(result: &RunResult, options: &OutdatedOptions) -> io::Result<()> {
    match options.output {
        Some(ref path) => {
            let formatter = create_formatter(options.output_format, false);
            let mut writer = BufWriter::new(File::create(path)?);
            formatter.format(result, &mut writer)?;
            writer.flush()
        }
        None => {
            let formatter = create_formatter(options.output_format, true);
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            formatter.format(result, &mut writer)?;
            writer.flush()
        }
    }
}
