//! Package name filters
//!
//! Include and exclude filters are case-insensitive substrings matched
//! against direct dependency names.

/// Filter configuration for direct dependencies
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageFilter {
    /// If non-empty, a name must contain one of these
    pub include: Vec<String>,
    /// Names containing one of these are dropped
    pub exclude: Vec<String>,
}

impl PackageFilter {
    /// Create a filter that accepts every package
    pub fn new() -> Self {
        Self::default()
    }

    /// Set include filters
    pub fn with_include(mut self, include: Vec<String>) -> Self {
        self.include = lowercase(include);
        self
    }

    /// Set exclude filters
    pub fn with_exclude(mut self, exclude: Vec<String>) -> Self {
        self.exclude = lowercase(exclude);
        self
    }

    /// Check if a package should be reported
    pub fn accepts(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        if !self.include.is_empty() && !self.include.iter().any(|p| name.contains(p.as_str())) {
            return false;
        }
        !self.exclude.iter().any(|p| name.contains(p.as_str()))
    }
}

fn lowercase(patterns: Vec<String>) -> Vec<String> {
    patterns.into_iter().map(|p| p.to_lowercase()).collect()
}
