//! CLI argument parsing module for nuget-outdated
//!
//! Policy options are optional here so that a config file can supply them;
//! the merged result lives in [`crate::config::OutdatedOptions`].

use crate::domain::{PrereleasePolicy, VersionLock};
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tree
    #[default]
    Text,
    /// Machine-readable JSON
    Json,
}

/// Parse a strictly positive integer
fn parse_positive(s: &str) -> Result<usize, String> {
    let value: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid number: {}", s))?;
    if value == 0 {
        return Err("must be at least 1".to_string());
    }
    Ok(value)
}

/// Reports outdated NuGet dependencies of a .NET project
#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "nuget-outdated",
    version,
    about = "Reports outdated NuGet dependencies of a .NET project"
)]
pub struct CliArgs {
    /// Project file, or a directory containing exactly one project file
    #[arg(default_value = ".")]
    pub path: PathBuf,

    // Tree options
    /// Include transitive dependencies
    #[arg(short, long)]
    pub transitive: bool,

    /// Levels of transitive dependencies to show (default: 1)
    #[arg(long, value_parser = parse_positive)]
    pub transitive_depth: Option<usize>,

    /// Include dependencies added implicitly by the SDK
    #[arg(short = 'i', long)]
    pub include_auto_references: bool,

    // Resolution policies
    /// Whether prerelease versions may be reported as latest (default: auto)
    #[arg(long, value_enum)]
    pub pre_release: Option<PrereleasePolicy>,

    /// Keep latest versions on the current major or minor version (default: none)
    #[arg(long, value_enum)]
    pub version_lock: Option<VersionLock>,

    /// Ignore versions published less than this many days ago
    #[arg(long, value_name = "DAYS")]
    pub older_than: Option<u32>,

    // Filters
    /// Only report direct dependencies whose name contains this text (repeatable)
    #[arg(long, action = ArgAction::Append)]
    pub include: Vec<String>,

    /// Skip direct dependencies whose name contains this text (repeatable)
    #[arg(long, action = ArgAction::Append)]
    pub exclude: Vec<String>,

    /// Only show outdated dependencies and their ancestors
    #[arg(short, long)]
    pub outdated_only: bool,

    // Execution
    /// Do not run restore; the lock file must already exist
    #[arg(long)]
    pub no_restore: bool,

    /// Maximum number of concurrent version lookups (default: 8)
    #[arg(long, value_parser = parse_positive)]
    pub concurrency: Option<usize>,

    /// Read settings from this config file instead of nuget-outdated.toml
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    // Output
    /// Exit with code 2 when an outdated dependency is found
    #[arg(long)]
    pub fail_on_updates: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output_format: OutputFormat,

    /// Write the report to this file instead of stdout
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,
}

impl CliArgs {
    /// Returns true if progress indicators may be drawn
    pub fn shows_progress(&self) -> bool {
        !self.quiet && self.output_format == OutputFormat::Text && self.output.is_none()
    }

    /// Log filter directive implied by the verbosity flags
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            "nuget_outdated=error"
        } else if self.verbose {
            "nuget_outdated=debug"
        } else {
            "nuget_outdated=warn"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = CliArgs::parse_from(["nuget-outdated"]);
        assert_eq!(args.path, PathBuf::from("."));
        assert!(!args.transitive);
        assert!(args.transitive_depth.is_none());
        assert!(!args.include_auto_references);
        assert!(args.pre_release.is_none());
        assert!(args.version_lock.is_none());
        assert!(args.older_than.is_none());
        assert!(args.include.is_empty());
        assert!(args.exclude.is_empty());
        assert!(!args.outdated_only);
        assert!(!args.no_restore);
        assert!(!args.fail_on_updates);
        assert_eq!(args.output_format, OutputFormat::Text);
        assert!(args.output.is_none());
        assert!(!args.verbose);
        assert!(!args.quiet);
    }

    #[test]
    fn test_path_argument() {
        let args = CliArgs::parse_from(["nuget-outdated", "src/App/App.csproj"]);
        assert_eq!(args.path, PathBuf::from("src/App/App.csproj"));
    }

    #[test]
    fn test_short_flags() {
        let args = CliArgs::parse_from(["nuget-outdated", "-t", "-i", "-o", "-q"]);
        assert!(args.transitive);
        assert!(args.include_auto_references);
        assert!(args.outdated_only);
        assert!(args.quiet);
    }

    #[test]
    fn test_transitive_depth() {
        let args = CliArgs::parse_from(["nuget-outdated", "-t", "--transitive-depth", "3"]);
        assert_eq!(args.transitive_depth, Some(3));
    }

    #[test]
    fn test_transitive_depth_zero_rejected() {
        let result = CliArgs::try_parse_from(["nuget-outdated", "--transitive-depth", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_policies() {
        let args = CliArgs::parse_from([
            "nuget-outdated",
            "--pre-release",
            "always",
            "--version-lock",
            "major",
        ]);
        assert_eq!(args.pre_release, Some(PrereleasePolicy::Always));
        assert_eq!(args.version_lock, Some(VersionLock::Major));
    }

    #[test]
    fn test_invalid_policy_rejected() {
        let result = CliArgs::try_parse_from(["nuget-outdated", "--version-lock", "patch"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_filters_repeatable() {
        let args = CliArgs::parse_from([
            "nuget-outdated",
            "--include",
            "Serilog",
            "--include",
            "Autofac",
            "--exclude",
            "Sinks",
        ]);
        assert_eq!(args.include, vec!["Serilog", "Autofac"]);
        assert_eq!(args.exclude, vec!["Sinks"]);
    }

    #[test]
    fn test_output_options() {
        let args = CliArgs::parse_from([
            "nuget-outdated",
            "--output-format",
            "json",
            "--output",
            "report.json",
        ]);
        assert_eq!(args.output_format, OutputFormat::Json);
        assert_eq!(args.output, Some(PathBuf::from("report.json")));
        assert!(!args.shows_progress());
    }

    #[test]
    fn test_older_than() {
        let args = CliArgs::parse_from(["nuget-outdated", "--older-than", "14"]);
        assert_eq!(args.older_than, Some(14));
    }

    #[test]
    fn test_log_filter() {
        assert_eq!(CliArgs::parse_from(["nuget-outdated"]).log_filter(), "nuget_outdated=warn");
        assert_eq!(
            CliArgs::parse_from(["nuget-outdated", "--verbose"]).log_filter(),
            "nuget_outdated=debug"
        );
        assert_eq!(
            CliArgs::parse_from(["nuget-outdated", "-q"]).log_filter(),
            "nuget_outdated=error"
        );
    }

    #[test]
    fn test_shows_progress() {
        assert!(CliArgs::parse_from(["nuget-outdated"]).shows_progress());
        assert!(!CliArgs::parse_from(["nuget-outdated", "-q"]).shows_progress());
    }
}
