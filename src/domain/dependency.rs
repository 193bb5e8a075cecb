//! Dependency tree nodes

use super::{NuGetVersion, VersionRange};
use serde::Serialize;
use std::fmt;

/// A package dependency and the transitive dependencies it pulls in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dependency {
    /// Package name as declared
    pub name: String,
    /// Declared version range, absent when unbounded or unparseable
    pub version_range: Option<VersionRange>,
    /// Version selected by restore, absent when it could not be found in the lock file
    pub resolved_version: Option<NuGetVersion>,
    /// Whether the build tooling added this reference implicitly
    pub auto_referenced: bool,
    /// Dependencies of this package, in lock file order
    pub dependencies: Vec<Dependency>,
}

impl Dependency {
    /// Creates a new dependency without children
    pub fn new(
        name: impl Into<String>,
        version_range: Option<VersionRange>,
        resolved_version: Option<NuGetVersion>,
    ) -> Self {
        Self {
            name: name.into(),
            version_range,
            resolved_version,
            auto_referenced: false,
            dependencies: Vec::new(),
        }
    }

    /// Marks this dependency as implicitly referenced (builder pattern)
    pub fn with_auto_referenced(mut self, auto_referenced: bool) -> Self {
        self.auto_referenced = auto_referenced;
        self
    }

    /// Appends a child dependency (builder pattern)
    pub fn with_dependency(mut self, child: Dependency) -> Self {
        self.dependencies.push(child);
        self
    }

    /// Returns true if restore could not record a version for this package
    pub fn is_unresolved(&self) -> bool {
        self.resolved_version.is_none()
    }

    /// Number of nodes in this subtree, including this one
    pub fn node_count(&self) -> usize {
        1 + self
            .dependencies
            .iter()
            .map(Dependency::node_count)
            .sum::<usize>()
    }

    /// Distance from this node to its deepest descendant
    pub fn depth(&self) -> usize {
        self.dependencies
            .iter()
            .map(|d| d.depth() + 1)
            .max()
            .unwrap_or(0)
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.resolved_version {
            Some(ref version) => write!(f, "{} {}", self.name, version),
            None => write!(f, "{} (unresolved)", self.name),
        }
    }
}
