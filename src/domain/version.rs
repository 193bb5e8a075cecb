//! NuGet package versions
//!
//! NuGet versions are semver 2.0 with two twists:
//! - up to four numeric components (`1.2.3.4`), missing components are zero
//! - prerelease labels compare case-insensitively
//!
//! Build metadata (`+abc`) is kept for display but never affects ordering.

use crate::error::VersionError;
use regex::Regex;
use semver::Prerelease;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::LazyLock;

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d+)(?:\.(\d+))?(?:\.(\d+))?(?:\.(\d+))?(?:-([0-9A-Za-z][0-9A-Za-z.-]*))?(?:\+([0-9A-Za-z.-]+))?$",
    )
    .unwrap()
});

/// A parsed NuGet version
#[derive(Debug, Clone)]
pub struct NuGetVersion {
    major: u64,
    minor: u64,
    patch: u64,
    revision: u64,
    /// Lower-cased prerelease label used for ordering
    pre: Prerelease,
    /// Prerelease label as written
    pre_label: String,
    metadata: Option<String>,
}

impl NuGetVersion {
    /// Creates a stable version from numeric components
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            revision: 0,
            pre: Prerelease::EMPTY,
            pre_label: String::new(),
            metadata: None,
        }
    }

    /// Parses a NuGet version string such as `1.2.3`, `1.0`, `4.3.0.1` or `2.0.0-beta1`
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let trimmed = input.trim();
        let caps = VERSION_RE
            .captures(trimmed)
            .ok_or_else(|| VersionError::invalid_version(input, "not a NuGet version"))?;

        let component = |index: usize| -> Result<u64, VersionError> {
            match caps.get(index) {
                Some(m) => m
                    .as_str()
                    .parse()
                    .map_err(|_| VersionError::invalid_version(input, "component out of range")),
                None => Ok(0),
            }
        };

        let pre_label = caps
            .get(5)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        let pre = if pre_label.is_empty() {
            Prerelease::EMPTY
        } else {
            Prerelease::new(&pre_label.to_ascii_lowercase())
                .map_err(|e| VersionError::invalid_version(input, e.to_string()))?
        };

        Ok(Self {
            major: component(1)?,
            minor: component(2)?,
            patch: component(3)?,
            revision: component(4)?,
            pre,
            pre_label,
            metadata: caps.get(6).map(|m| m.as_str().to_string()),
        })
    }

    /// Returns a copy of this version carrying the given prerelease label
    pub fn with_prerelease(mut self, label: &str) -> Result<Self, VersionError> {
        self.pre = Prerelease::new(&label.to_ascii_lowercase())
            .map_err(|e| VersionError::invalid_version(label, e.to_string()))?;
        self.pre_label = label.to_string();
        Ok(self)
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    /// Returns true if this version carries a prerelease label
    pub fn is_prerelease(&self) -> bool {
        !self.pre.is_empty()
    }

    fn numeric(&self) -> (u64, u64, u64, u64) {
        (self.major, self.minor, self.patch, self.revision)
    }
}

impl Ord for NuGetVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        // Prerelease's Ord already ranks an empty label above any non-empty one
        self.numeric()
            .cmp(&other.numeric())
            .then_with(|| self.pre.cmp(&other.pre))
    }
}

impl PartialOrd for NuGetVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for NuGetVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NuGetVersion {}

impl Hash for NuGetVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.numeric().hash(state);
        self.pre.hash(state);
    }
}

impl FromStr for NuGetVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for NuGetVersion {
    /// Writes the normalized form: three components, a fourth only when non-zero
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if self.revision > 0 {
            write!(f, ".{}", self.revision)?;
        }
        if !self.pre_label.is_empty() {
            write!(f, "-{}", self.pre_label)?;
        }
        if let Some(ref metadata) = self.metadata {
            write!(f, "+{}", metadata)?;
        }
        Ok(())
    }
}

impl Serialize for NuGetVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
