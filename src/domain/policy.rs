//! Policies restricting which upstream versions count as "latest"

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether prerelease versions are eligible as latest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrereleasePolicy {
    /// Prereleases are eligible only when the current version is itself a prerelease
    #[default]
    Auto,
    /// Prereleases are always eligible
    Always,
    /// Prereleases are never eligible
    Never,
}

impl PrereleasePolicy {
    /// Decides whether prerelease candidates are allowed given the current version
    pub fn allows_prerelease(&self, current_is_prerelease: bool) -> bool {
        match self {
            PrereleasePolicy::Auto => current_is_prerelease,
            PrereleasePolicy::Always => true,
            PrereleasePolicy::Never => false,
        }
    }
}

impl fmt::Display for PrereleasePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrereleasePolicy::Auto => write!(f, "auto"),
            PrereleasePolicy::Always => write!(f, "always"),
            PrereleasePolicy::Never => write!(f, "never"),
        }
    }
}

/// How far a latest-version search may move away from the current version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionLock {
    /// No restriction beyond the declared range
    #[default]
    None,
    /// Stay on the current major version
    Major,
    /// Stay on the current major and minor version
    Minor,
}

impl VersionLock {
    /// Returns true if `candidate` is inside the lock window around `current`
    pub fn permits(&self, current: &super::NuGetVersion, candidate: &super::NuGetVersion) -> bool {
        match self {
            VersionLock::None => true,
            VersionLock::Major => candidate.major() == current.major(),
            VersionLock::Minor => {
                candidate.major() == current.major() && candidate.minor() == current.minor()
            }
        }
    }
}

impl fmt::Display for VersionLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionLock::None => write!(f, "none"),
            VersionLock::Major => write!(f, "major"),
            VersionLock::Minor => write!(f, "minor"),
        }
    }
}
