//! Projects and their target frameworks

use super::Dependency;
use serde::Serialize;
use std::path::PathBuf;

/// One compilation target of a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetFramework {
    /// Framework identifier as declared (e.g. `net8.0`)
    pub name: String,
    /// Direct dependencies in declaration order
    pub dependencies: Vec<Dependency>,
}

impl TargetFramework {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dependencies: Vec::new(),
        }
    }

    /// Appends a direct dependency (builder pattern)
    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }
}

/// A restored project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    /// Project name
    pub name: String,
    /// Path to the project file
    pub path: PathBuf,
    /// Package source URIs configured for this project
    pub sources: Vec<String>,
    /// Target frameworks in declaration order
    pub target_frameworks: Vec<TargetFramework>,
}

impl Project {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, sources: Vec<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            sources,
            target_frameworks: Vec::new(),
        }
    }

    /// Appends a target framework (builder pattern)
    pub fn with_target_framework(mut self, target_framework: TargetFramework) -> Self {
        self.target_frameworks.push(target_framework);
        self
    }

    /// Total number of dependency nodes across all target frameworks
    pub fn dependency_count(&self) -> usize {
        self.target_frameworks
            .iter()
            .flat_map(|tf| tf.dependencies.iter())
            .map(Dependency::node_count)
            .sum()
    }
}
