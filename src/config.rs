//! Configuration file support
//!
//! Policy defaults may live in a `nuget-outdated.toml` file next to the
//! project, or in a file named with `--config`. Command-line flags take
//! precedence over the file, which takes precedence over built-in defaults.

use crate::cli::{CliArgs, OutputFormat};
use crate::domain::{PrereleasePolicy, VersionLock};
use crate::error::{AppError, ConfigError};
use crate::graph::{discover_project, project_dir, BuildOptions};
use crate::report::{PackageFilter, ReportOptions};
use crate::resolve::{VersionSelector, DEFAULT_CONCURRENCY};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name looked up next to the analysed project
pub const CONFIG_FILENAME: &str = "nuget-outdated.toml";

/// Settings read from a config file; every key is optional
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub transitive: Option<bool>,
    pub transitive_depth: Option<usize>,
    pub include_auto_references: Option<bool>,
    pub pre_release: Option<PrereleasePolicy>,
    pub version_lock: Option<VersionLock>,
    pub outdated_only: Option<bool>,
    pub older_than_days: Option<u32>,
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub concurrency: Option<usize>,
    /// Keys this version does not know about
    #[serde(flatten)]
    pub unknown: BTreeMap<String, toml::Value>,
}

impl ConfigFile {
    /// Parse config file content
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: ConfigFile =
            toml::from_str(content).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        for key in config.unknown.keys() {
            warn!("Unknown key '{}' in {} is ignored", key, path.display());
        }
        Ok(config)
    }

    /// Load a config file that must exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded config from {}", path.display());
        Self::parse(&content, path)
    }

    /// Look for `nuget-outdated.toml` in a directory
    pub fn discover(dir: &Path) -> Result<Option<Self>, ConfigError> {
        let path = dir.join(CONFIG_FILENAME);
        if !path.is_file() {
            return Ok(None);
        }
        Self::load(&path).map(Some)
    }
}

/// Effective settings for one run
///
/// Built once from the command line and the optional config file, then only
/// read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutdatedOptions {
    pub transitive: bool,
    pub transitive_depth: usize,
    pub include_auto_references: bool,
    pub pre_release: PrereleasePolicy,
    pub version_lock: VersionLock,
    pub outdated_only: bool,
    pub older_than_days: Option<u32>,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub concurrency: usize,
    pub restore: bool,
    pub fail_on_updates: bool,
    pub output_format: OutputFormat,
    pub output: Option<PathBuf>,
    pub show_progress: bool,
}

impl OutdatedOptions {
    /// Resolve options from CLI arguments, loading the config file
    ///
    /// An explicit `--config` must exist. Otherwise the file is looked up in
    /// `config_dir`, usually the directory of the analysed project.
    pub fn resolve(args: &CliArgs, config_dir: &Path) -> Result<Self, ConfigError> {
        let file = match args.config {
            Some(ref path) => Some(ConfigFile::load(path)?),
            None => ConfigFile::discover(config_dir)?,
        };
        Self::merge(args, file.unwrap_or_default())
    }

    /// Discover the project named on the command line and resolve its options
    pub fn for_project(args: &CliArgs) -> Result<(PathBuf, Self), AppError> {
        let project = discover_project(&args.path)?;
        let options = Self::resolve(args, project_dir(&project))?;
        Ok((project, options))
    }

    /// Merge CLI arguments over config file values
    pub fn merge(args: &CliArgs, file: ConfigFile) -> Result<Self, ConfigError> {
        if args.quiet && args.verbose {
            return Err(ConfigError::ConflictingOptions {
                message: "--quiet and --verbose cannot be used together".to_string(),
            });
        }

        let transitive_depth = args
            .transitive_depth
            .or(file.transitive_depth)
            .unwrap_or(1);
        if transitive_depth == 0 {
            return Err(ConfigError::invalid_value(
                "transitive_depth",
                "must be at least 1",
            ));
        }

        let concurrency = args
            .concurrency
            .or(file.concurrency)
            .unwrap_or(DEFAULT_CONCURRENCY);
        if concurrency == 0 {
            return Err(ConfigError::invalid_value("concurrency", "must be at least 1"));
        }

        let include = pick_list(&args.include, file.include);
        let exclude = pick_list(&args.exclude, file.exclude);
        for pattern in include.iter().chain(&exclude) {
            if pattern.trim().is_empty() {
                return Err(ConfigError::invalid_value(
                    "include/exclude",
                    "filters must not be empty",
                ));
            }
        }

        Ok(Self {
            transitive: args.transitive || file.transitive.unwrap_or(false),
            transitive_depth,
            include_auto_references: args.include_auto_references
                || file.include_auto_references.unwrap_or(false),
            pre_release: args.pre_release.or(file.pre_release).unwrap_or_default(),
            version_lock: args.version_lock.or(file.version_lock).unwrap_or_default(),
            outdated_only: args.outdated_only || file.outdated_only.unwrap_or(false),
            older_than_days: args.older_than.or(file.older_than_days),
            include,
            exclude,
            concurrency,
            restore: !args.no_restore,
            fail_on_updates: args.fail_on_updates,
            output_format: args.output_format,
            output: args.output.clone(),
            show_progress: args.shows_progress(),
        })
    }

    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            include_transitive: self.transitive,
            max_depth: self.transitive_depth,
            restore: self.restore,
        }
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            include_auto_referenced: self.include_auto_references,
            outdated_only: self.outdated_only,
            filter: PackageFilter::new()
                .with_include(self.include.clone())
                .with_exclude(self.exclude.clone()),
        }
    }

    pub fn selector(&self) -> VersionSelector {
        let selector = VersionSelector::new(self.pre_release, self.version_lock);
        match self.older_than_days {
            Some(days) => selector.with_min_age_days(days),
            None => selector,
        }
    }
}

impl Default for OutdatedOptions {
    fn default() -> Self {
        Self {
            transitive: false,
            transitive_depth: 1,
            include_auto_references: false,
            pre_release: PrereleasePolicy::default(),
            version_lock: VersionLock::default(),
            outdated_only: false,
            older_than_days: None,
            include: Vec::new(),
            exclude: Vec::new(),
            concurrency: DEFAULT_CONCURRENCY,
            restore: true,
            fail_on_updates: false,
            output_format: OutputFormat::Text,
            output: None,
            show_progress: false,
        }
    }
}

/// CLI list if given, file list otherwise
fn pick_list(cli: &[String], file: Option<Vec<String>>) -> Vec<String> {
    if cli.is_empty() {
        file.unwrap_or_default()
    } else {
        cli.to_vec()
    }
}
