//! Published version information
//!
//! A candidate version as reported by a package source, with its publish
//! date when the source records one.

use crate::domain::NuGetVersion;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Information about a package version from a source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionInfo {
    pub version: NuGetVersion,
    /// Publish date; local feeds carry none
    pub published: Option<DateTime<Utc>>,
}

impl VersionInfo {
    /// Create a VersionInfo with a publish date
    pub fn new(version: NuGetVersion, published: DateTime<Utc>) -> Self {
        Self {
            version,
            published: Some(published),
        }
    }

    /// Create a VersionInfo without a publish date
    pub fn undated(version: NuGetVersion) -> Self {
        Self {
            version,
            published: None,
        }
    }

    /// Returns true if published at or before the cutoff, or if undated
    pub fn published_before(&self, cutoff: DateTime<Utc>) -> bool {
        self.published.is_none_or(|date| date <= cutoff)
    }
}

impl Ord for VersionInfo {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.version
            .cmp(&other.version)
            .then_with(|| self.published.cmp(&other.published))
    }
}

impl PartialOrd for VersionInfo {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
