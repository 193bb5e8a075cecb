//! NuGet version ranges
//!
//! Handles the notations that appear in project files and assets files:
//! - Minimum version: `1.0` (>= 1.0)
//! - Exact version: `[1.0]`
//! - Interval notation: `[1.0,2.0)`, `(1.0,)`, `(,2.0]`
//! - Floating versions: `*`, `1.*`, `1.0.*`, `1.0.0-*`, `1.0.0-beta*`
//!
//! A floating token is reduced to the lowest version it can match and used
//! as an inclusive lower bound.

use super::NuGetVersion;
use crate::error::VersionError;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

// Interval notation: [lower, upper] with either side optional
static INTERVAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([\[\(])\s*([^,\s]*)\s*(?:,\s*([^,\s]*)\s*)?([\]\)])$").unwrap());

// Floating numeric part: 1.*, 1.2.*, 1.2.3.*
static FLOAT_NUMERIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^((?:\d+\.){1,3})\*$").unwrap());

// Floating prerelease: 1.0.0-*, 1.0.0-beta*
static FLOAT_PRERELEASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+(?:\.\d+){0,3})-([0-9A-Za-z.-]*)\*$").unwrap());

/// A bound of a version range
#[derive(Debug, Clone, PartialEq, Eq)]
struct Bound {
    version: NuGetVersion,
    inclusive: bool,
}

/// A parsed NuGet version range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    min: Option<Bound>,
    max: Option<Bound>,
    raw: String,
}

impl VersionRange {
    /// A range accepting exactly one version
    fn exact(version: NuGetVersion) -> Self {
        let raw = format!("[{}]", version);
        Self {
            min: Some(Bound {
                version: version.clone(),
                inclusive: true,
            }),
            max: Some(Bound {
                version,
                inclusive: true,
            }),
            raw,
        }
    }

    /// Parses a NuGet range string
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(VersionError::invalid_range(input, "empty range"));
        }

        if let Some(caps) = INTERVAL_RE.captures(trimmed) {
            return Self::parse_interval(input, &caps);
        }

        let (version, _) = parse_bound_token(input, trimmed)?;
        Ok(Self {
            min: version.map(|version| Bound {
                version,
                inclusive: true,
            }),
            max: None,
            raw: trimmed.to_string(),
        })
    }

    fn parse_interval(input: &str, caps: &regex::Captures<'_>) -> Result<Self, VersionError> {
        let open = &caps[1];
        let close = &caps[4];
        let lower = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        let has_comma = caps.get(3).is_some();
        let upper = caps.get(3).map(|m| m.as_str()).unwrap_or("");

        if !has_comma {
            // [1.0] is the only valid single-token interval
            if open != "[" || close != "]" || lower.is_empty() {
                return Err(VersionError::invalid_range(
                    input,
                    "single version interval must be inclusive on both sides",
                ));
            }
            let version = NuGetVersion::parse(lower)
                .map_err(|e| VersionError::invalid_range(input, e.to_string()))?;
            let mut range = Self::exact(version);
            range.raw = input.trim().to_string();
            return Ok(range);
        }

        let (min_version, min_floating) = if lower.is_empty() {
            (None, false)
        } else {
            parse_bound_token(input, lower)?
        };
        let max_version = if upper.is_empty() {
            None
        } else {
            Some(
                NuGetVersion::parse(upper)
                    .map_err(|e| VersionError::invalid_range(input, e.to_string()))?,
            )
        };

        if min_version.is_none() && max_version.is_none() && !min_floating {
            return Err(VersionError::invalid_range(input, "range has no bounds"));
        }

        let range = Self {
            min: min_version.map(|version| Bound {
                version,
                inclusive: open == "[",
            }),
            max: max_version.map(|version| Bound {
                version,
                inclusive: close == "]",
            }),
            raw: input.trim().to_string(),
        };

        if let (Some(min), Some(max)) = (&range.min, &range.max) {
            let empty = min.version > max.version
                || (min.version == max.version && !(min.inclusive && max.inclusive));
            if empty {
                return Err(VersionError::invalid_range(input, "range is empty"));
            }
        }

        Ok(range)
    }

    /// Returns true if the version falls inside this range
    pub fn satisfies(&self, version: &NuGetVersion) -> bool {
        if let Some(ref min) = self.min {
            let ok = if min.inclusive {
                version >= &min.version
            } else {
                version > &min.version
            };
            if !ok {
                return false;
            }
        }
        if let Some(ref max) = self.max {
            let ok = if max.inclusive {
                version <= &max.version
            } else {
                version < &max.version
            };
            if !ok {
                return false;
            }
        }
        true
    }
}

/// Parses a lower-bound token, which may float
fn parse_bound_token(
    input: &str,
    token: &str,
) -> Result<(Option<NuGetVersion>, bool), VersionError> {
    if token == "*" {
        return Ok((None, true));
    }

    if let Some(caps) = FLOAT_NUMERIC_RE.captures(token) {
        let prefix = caps[1].trim_end_matches('.');
        let version = NuGetVersion::parse(prefix)
            .map_err(|e| VersionError::invalid_range(input, e.to_string()))?;
        return Ok((Some(version), true));
    }

    if let Some(caps) = FLOAT_PRERELEASE_RE.captures(token) {
        let base = NuGetVersion::parse(&caps[1])
            .map_err(|e| VersionError::invalid_range(input, e.to_string()))?;
        // "0" is the lowest possible prerelease label
        let label = match caps[2].trim_end_matches(['.', '-']) {
            "" => "0",
            label => label,
        };
        let version = base
            .with_prerelease(label)
            .map_err(|e| VersionError::invalid_range(input, e.to_string()))?;
        return Ok((Some(version), true));
    }

    let version =
        NuGetVersion::parse(token).map_err(|e| VersionError::invalid_range(input, e.to_string()))?;
    Ok((Some(version), false))
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for VersionRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> NuGetVersion {
        NuGetVersion::parse(s).unwrap()
    }

    fn range(s: &str) -> VersionRange {
        VersionRange::parse(s).unwrap()
    }

    #[test]
    fn test_plain_version_is_inclusive_minimum() {
        let r = range("1.0");
        assert!(r.satisfies(&v("1.0.0")));
        assert!(r.satisfies(&v("5.0.0")));
        assert!(!r.satisfies(&v("0.9.9")));
        assert!(r.max.is_none());
    }

    #[test]
    fn test_exact_range() {
        let r = range("[1.2.3]");
        assert_eq!(r.min, r.max);
        assert!(r.satisfies(&v("1.2.3")));
        assert!(!r.satisfies(&v("1.2.4")));
    }

    #[test]
    fn test_restore_style_minimum() {
        // Restore writes PackageReference versions like this
        let r = range("[13.0.1, )");
        assert!(r.satisfies(&v("13.0.1")));
        assert!(r.satisfies(&v("14.0.0")));
        assert!(!r.satisfies(&v("13.0.0")));
    }

    #[test]
    fn test_bounded_half_open() {
        let r = range("[1.0,2.0)");
        assert!(r.satisfies(&v("1.0.0")));
        assert!(r.satisfies(&v("1.99.0")));
        assert!(!r.satisfies(&v("2.0.0")));
        // prerelease of the upper bound sorts below it
        assert!(r.satisfies(&v("2.0.0-beta")));
    }

    #[test]
    fn test_exclusive_lower_bound() {
        let r = range("(1.0,)");
        assert!(!r.satisfies(&v("1.0.0")));
        assert!(r.satisfies(&v("1.0.1")));
    }

    #[test]
    fn test_maximum_only() {
        let r = range("(,2.0]");
        assert!(r.satisfies(&v("0.1.0")));
        assert!(r.satisfies(&v("2.0.0")));
        assert!(!r.satisfies(&v("2.0.1")));
    }

    #[test]
    fn test_floating_star() {
        let r = range("*");
        assert!(r.min.is_none());
        assert!(r.satisfies(&v("0.0.1")));
        assert!(r.satisfies(&v("99.0.0")));
    }

    #[test]
    fn test_floating_minor() {
        let r = range("1.*");
        assert_eq!(r.min.as_ref().unwrap().version, v("1.0.0"));
        assert!(r.satisfies(&v("1.5.0")));
        assert!(!r.satisfies(&v("0.9.0")));
    }

    #[test]
    fn test_floating_prerelease() {
        let r = range("1.0.0-*");
        assert!(r.satisfies(&v("1.0.0-alpha")));
        assert!(r.satisfies(&v("1.0.0")));
        assert!(!r.satisfies(&v("0.9.0")));

        let r = range("1.0.0-beta*");
        assert!(r.satisfies(&v("1.0.0-beta2")));
        assert!(!r.satisfies(&v("1.0.0-alpha")));
    }

    #[test]
    fn test_floating_inside_interval() {
        let r = range("[1.*, 2.0)");
        assert_eq!(r.min.as_ref().unwrap().version, v("1.0.0"));
        assert!(r.satisfies(&v("1.3.0")));
        assert!(!r.satisfies(&v("2.0.0")));
    }

    #[test]
    fn test_invalid_ranges() {
        assert!(VersionRange::parse("").is_err());
        assert!(VersionRange::parse("(1.0)").is_err());
        assert!(VersionRange::parse("[2.0, 1.0]").is_err());
        assert!(VersionRange::parse("(1.0, 1.0)").is_err());
        assert!(VersionRange::parse("[,]").is_err());
        assert!(VersionRange::parse("abc").is_err());
    }

    #[test]
    fn test_display_keeps_original_notation() {
        assert_eq!(range("[13.0.1, )").to_string(), "[13.0.1, )");
        assert_eq!(range("1.*").to_string(), "1.*");
    }
}
