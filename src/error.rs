//! Application error types using thiserror
//!
//! Error hierarchy:
//! - GraphError: the project graph could not be produced (fatal for the run)
//! - ProjectError: restore or lock file problems (fatal for one project only)
//! - SourceError: package source failures (soft, per source)
//! - VersionError: unparseable versions and version ranges
//! - ConfigError: invalid CLI or config file settings

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Project graph related errors
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Per-project errors
    #[error(transparent)]
    Project(#[from] ProjectError),

    /// Package source related errors
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors that prevent any project from being analysed
#[derive(Error, Debug)]
pub enum GraphError {
    /// The dependency graph spec could not be generated or read
    #[error("unable to produce the dependency graph for {path}: {message}")]
    Unavailable { path: PathBuf, message: String },

    /// The graph has no project using package references
    #[error("no project in the dependency graph uses package references")]
    NoRestorableProjects,

    /// No project file at the given location
    #[error("no project file found at {path}")]
    ProjectNotFound { path: PathBuf },

    /// More than one project file in a directory
    #[error("found {count} project files in {path}; specify which one to analyse")]
    AmbiguousProject { path: PathBuf, count: usize },
}

/// Errors that stop one project from being analysed
#[derive(Error, Debug)]
pub enum ProjectError {
    /// The external restore reported failure
    #[error("failed to restore {path}: {message}")]
    RestoreFailed { path: PathBuf, message: String },

    /// The lock file is absent after restore
    #[error("lock file not found for {project}: {path}")]
    LockFileMissing { project: PathBuf, path: PathBuf },

    /// The lock file exists but cannot be read
    #[error("failed to read lock file {path}: {message}")]
    LockFileInvalid { path: PathBuf, message: String },
}

/// Errors related to package source communication
#[derive(Error, Debug)]
pub enum SourceError {
    /// Package not found on the source
    #[error("package '{package}' not found on {source_uri}")]
    PackageNotFound { package: String, source_uri: String },

    /// Network request failed
    #[error("failed to fetch package '{package}' from {source_uri}: {message}")]
    NetworkError {
        package: String,
        source_uri: String,
        message: String,
    },

    /// Rate limit exceeded
    #[error("rate limit exceeded for {source_uri}")]
    RateLimitExceeded { source_uri: String },

    /// Invalid response from the source
    #[error("invalid response from {source_uri} for '{package}': {message}")]
    InvalidResponse {
        package: String,
        source_uri: String,
        message: String,
    },

    /// Timeout
    #[error("timeout while fetching '{package}' from {source_uri}")]
    Timeout { package: String, source_uri: String },

    /// The service index lacks a resource this client needs
    #[error("{source_uri} does not provide a {resource} resource")]
    MissingResource {
        source_uri: String,
        resource: String,
    },

    /// Local feed could not be read
    #[error("failed to read local feed {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors for unparseable versions and ranges
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// Invalid version string
    #[error("invalid version '{value}': {message}")]
    InvalidVersion { value: String, message: String },

    /// Invalid version range string
    #[error("invalid version range '{value}': {message}")]
    InvalidRange { value: String, message: String },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML or has wrongly typed values
    #[error("failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    /// Value out of range
    #[error("invalid value for {option}: {message}")]
    InvalidValue { option: String, message: String },

    /// Conflicting options
    #[error("conflicting options: {message}")]
    ConflictingOptions { message: String },
}

impl GraphError {
    /// Creates a new Unavailable error
    pub fn unavailable(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        GraphError::Unavailable {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl ProjectError {
    /// Creates a new RestoreFailed error
    pub fn restore_failed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ProjectError::RestoreFailed {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new LockFileMissing error
    pub fn lock_file_missing(project: impl Into<PathBuf>, path: impl Into<PathBuf>) -> Self {
        ProjectError::LockFileMissing {
            project: project.into(),
            path: path.into(),
        }
    }

    /// Creates a new LockFileInvalid error
    pub fn lock_file_invalid(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ProjectError::LockFileInvalid {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl SourceError {
    /// Creates a new PackageNotFound error
    pub fn package_not_found(package: impl Into<String>, source_uri: impl Into<String>) -> Self {
        SourceError::PackageNotFound {
            package: package.into(),
            source_uri: source_uri.into(),
        }
    }

    /// Creates a new NetworkError
    pub fn network_error(
        package: impl Into<String>,
        source_uri: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        SourceError::NetworkError {
            package: package.into(),
            source_uri: source_uri.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(
        package: impl Into<String>,
        source_uri: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        SourceError::InvalidResponse {
            package: package.into(),
            source_uri: source_uri.into(),
            message: message.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(package: impl Into<String>, source_uri: impl Into<String>) -> Self {
        SourceError::Timeout {
            package: package.into(),
            source_uri: source_uri.into(),
        }
    }

    /// Returns true if the source answered that it does not know the package
    pub fn is_not_found(&self) -> bool {
        matches!(self, SourceError::PackageNotFound { .. })
    }
}

impl VersionError {
    /// Creates a new InvalidVersion error
    pub fn invalid_version(value: impl Into<String>, message: impl Into<String>) -> Self {
        VersionError::InvalidVersion {
            value: value.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidRange error
    pub fn invalid_range(value: impl Into<String>, message: impl Into<String>) -> Self {
        VersionError::InvalidRange {
            value: value.into(),
            message: message.into(),
        }
    }
}

impl ConfigError {
    /// Creates a new InvalidValue error
    pub fn invalid_value(option: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            option: option.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_error_unavailable() {
        let err = GraphError::unavailable("/src/App.csproj", "dotnet not found");
        let msg = format!("{}", err);
        assert!(msg.contains("unable to produce the dependency graph"));
        assert!(msg.contains("App.csproj"));
        assert!(msg.contains("dotnet not found"));
    }

    #[test]
    fn test_graph_error_ambiguous() {
        let err = GraphError::AmbiguousProject {
            path: PathBuf::from("/src"),
            count: 2,
        };
        assert!(err.to_string().contains("found 2 project files"));
    }

    #[test]
    fn test_project_error_restore_failed() {
        let err = ProjectError::restore_failed("/src/App.csproj", "NU1101: Unable to find package");
        let msg = format!("{}", err);
        assert!(msg.contains("failed to restore"));
        assert!(msg.contains("NU1101"));
    }

    #[test]
    fn test_project_error_lock_file_missing() {
        let err = ProjectError::lock_file_missing("/src/App.csproj", "/src/obj/project.assets.json");
        let msg = format!("{}", err);
        assert!(msg.contains("lock file not found"));
        assert!(msg.contains("project.assets.json"));
    }

    #[test]
    fn test_source_error_package_not_found() {
        let err = SourceError::package_not_found("Nope", "https://api.nuget.org/v3/index.json");
        assert!(err.is_not_found());
        assert!(err.to_string().contains("package 'Nope' not found"));
    }

    #[test]
    fn test_source_error_network() {
        let err = SourceError::network_error("Serilog", "https://feed", "connection refused");
        assert!(!err.is_not_found());
        let msg = format!("{}", err);
        assert!(msg.contains("failed to fetch"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn test_source_error_timeout() {
        let err = SourceError::timeout("Serilog", "https://feed");
        let msg = format!("{}", err);
        assert!(msg.contains("timeout"));
        assert!(msg.contains("Serilog"));
    }

    #[test]
    fn test_source_error_missing_resource() {
        let err = SourceError::MissingResource {
            source_uri: "https://feed/index.json".to_string(),
            resource: "RegistrationsBaseUrl".to_string(),
        };
        assert!(err.to_string().contains("does not provide a RegistrationsBaseUrl"));
    }

    #[test]
    fn test_version_errors() {
        let err = VersionError::invalid_version("abc", "not a NuGet version");
        assert!(err.to_string().contains("invalid version 'abc'"));

        let err = VersionError::invalid_range("(1.0)", "range is empty");
        assert!(err.to_string().contains("invalid version range '(1.0)'"));
    }

    #[test]
    fn test_config_error_invalid_value() {
        let err = ConfigError::invalid_value("transitive_depth", "must be at least 1");
        let msg = format!("{}", err);
        assert!(msg.contains("invalid value for transitive_depth"));
    }

    #[test]
    fn test_app_error_from_graph_error() {
        let app_err: AppError = GraphError::NoRestorableProjects.into();
        assert!(app_err.to_string().contains("package references"));
    }

    #[test]
    fn test_app_error_from_project_error() {
        let app_err: AppError = ProjectError::restore_failed("/p", "boom").into();
        assert!(app_err.to_string().contains("failed to restore"));
    }

    #[test]
    fn test_app_error_from_config_error() {
        let app_err: AppError = ConfigError::ConflictingOptions {
            message: "--quiet and --verbose cannot be used together".to_string(),
        }
        .into();
        assert!(app_err.to_string().contains("conflicting options"));
    }

    #[test]
    fn test_error_debug_trait() {
        let err = GraphError::ProjectNotFound {
            path: PathBuf::from("/test"),
        };
        let debug = format!("{:?}", err);
        assert!(debug.contains("ProjectNotFound"));
    }
}
