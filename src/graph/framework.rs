//! Target framework identifiers
//!
//! The dependency graph spec names frameworks by their short alias (`net8.0`)
//! while the assets file may use either the alias or the long form
//! (`.NETCoreApp,Version=v8.0`). Both are normalized here so that matching
//! is an exact comparison.

use regex::Regex;
use std::sync::LazyLock;

// .NETCoreApp,Version=v8.0 or .NETFramework,Version=v4.7.2,Profile=Client
static LONG_FORM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([.A-Za-z0-9]+),\s*Version=v?(\d+(?:\.\d+)*)(?:,\s*Profile=(\w+))?$").unwrap()
});

// net8.0, net8.0-windows, net8.0-windows10.0.19041, netcoreapp3.1, netstandard2.0, net472
// The platform version is dropped: a project targets one version per platform,
// so net8.0-windows10.0.19041 and net8.0-windows7.0 normalize equal.
static SHORT_FORM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(netcoreapp|netstandard|net)(\d+(?:\.\d+)*)(?:-([A-Za-z]+)[\d.]*)?$").unwrap()
});

/// A normalized framework identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FrameworkName {
    identifier: String,
    version: String,
    platform: Option<String>,
}

impl FrameworkName {
    /// Parses a short alias or long framework name
    ///
    /// Unrecognised names are kept verbatim (lower-cased) so they can still
    /// be compared with each other.
    pub fn parse(name: &str) -> Self {
        let trimmed = name.trim();

        if let Some(caps) = LONG_FORM_RE.captures(trimmed) {
            return Self {
                identifier: caps[1].to_ascii_lowercase(),
                version: normalize_version(&caps[2]),
                platform: caps.get(3).map(|m| m.as_str().to_ascii_lowercase()),
            };
        }

        let lower = trimmed.to_ascii_lowercase();
        if let Some(caps) = SHORT_FORM_RE.captures(&lower) {
            let moniker = &caps[1];
            let raw_version = &caps[2];
            let platform = caps.get(3).map(|m| m.as_str().to_string());

            let (identifier, version) = match moniker {
                "netcoreapp" => (".netcoreapp", normalize_version(raw_version)),
                "netstandard" => (".netstandard", normalize_version(raw_version)),
                _ if raw_version.contains('.') => (".netcoreapp", normalize_version(raw_version)),
                // net472 style: one digit per component
                _ => (".netframework", normalize_version(&dotted(raw_version))),
            };

            return Self {
                identifier: identifier.to_string(),
                version,
                platform,
            };
        }

        Self {
            identifier: lower,
            version: String::new(),
            platform: None,
        }
    }
}

/// Turns `472` into `4.7.2`
fn dotted(digits: &str) -> String {
    digits
        .chars()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

/// Drops trailing zero components beyond major.minor
fn normalize_version(version: &str) -> String {
    let mut parts: Vec<&str> = version.split('.').collect();
    while parts.len() > 2 && parts.last().is_some_and(|p| p.trim_start_matches('0').is_empty()) {
        parts.pop();
    }
    if parts.len() == 1 {
        parts.push("0");
    }
    parts.join(".")
}

/// Returns true if the two framework names denote the same framework
pub fn frameworks_match(a: &str, b: &str) -> bool {
    FrameworkName::parse(a) == FrameworkName::parse(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_and_long_core_forms_match() {
        assert!(frameworks_match("net8.0", ".NETCoreApp,Version=v8.0"));
        assert!(frameworks_match("netcoreapp3.1", ".NETCoreApp,Version=v3.1"));
        assert!(frameworks_match("netstandard2.0", ".NETStandard,Version=v2.0"));
    }

    #[test]
    fn test_net_framework_forms_match() {
        assert!(frameworks_match("net472", ".NETFramework,Version=v4.7.2"));
        assert!(frameworks_match("net48", ".NETFramework,Version=v4.8"));
    }

    #[test]
    fn test_identical_aliases_match() {
        assert!(frameworks_match("net8.0", "net8.0"));
        assert!(frameworks_match("NET8.0", "net8.0"));
    }

    #[test]
    fn test_different_versions_do_not_match() {
        assert!(!frameworks_match("net8.0", "net7.0"));
        assert!(!frameworks_match("net8.0", ".NETCoreApp,Version=v7.0"));
        assert!(!frameworks_match("netstandard2.0", "netstandard2.1"));
    }

    #[test]
    fn test_platform_suffix() {
        assert!(frameworks_match("net8.0-windows", "net8.0-windows7.0"));
        assert!(frameworks_match("net8.0-windows10.0.19041", "net8.0-windows7.0"));
        assert!(!frameworks_match("net8.0-windows", "net8.0"));
        assert!(!frameworks_match("net8.0-android", "net8.0-ios"));
    }

    #[test]
    fn test_trailing_zero_components() {
        assert!(frameworks_match("net8.0", ".NETCoreApp,Version=v8.0.0"));
    }

    #[test]
    fn test_unknown_names_compare_verbatim() {
        assert!(frameworks_match("uap10.0", "UAP10.0"));
        assert!(!frameworks_match("uap10.0", "net8.0"));
    }

    #[test]
    fn test_profile_is_part_of_identity() {
        assert!(!frameworks_match(
            ".NETFramework,Version=v4.0,Profile=Client",
            ".NETFramework,Version=v4.0"
        ));
    }
}
