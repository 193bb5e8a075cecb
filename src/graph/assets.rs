//! Lock file (`project.assets.json`) model
//!
//! Only the `targets` section is read: for every target framework it lists
//! the libraries restore selected, their resolved version and their own
//! declared dependencies.

use super::framework::frameworks_match;
use crate::domain::NuGetVersion;
use crate::error::ProjectError;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;
use tracing::warn;

/// Raw lock file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LockFile {
    #[serde(default)]
    pub targets: IndexMap<String, IndexMap<String, TargetLibraryEntry>>,
}

/// A library entry of a lock file target, keyed by `Name/Version`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TargetLibraryEntry {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Declared dependencies of this library: name to version range
    #[serde(default)]
    pub dependencies: IndexMap<String, String>,
}

/// A resolved library of one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetLibrary {
    pub name: String,
    pub version: NuGetVersion,
    /// Declared dependencies in lock file order: name and raw range
    pub dependencies: Vec<(String, String)>,
}

/// The libraries restore selected for one target framework
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockFileTarget {
    pub framework: String,
    pub libraries: Vec<TargetLibrary>,
}

impl LockFile {
    /// Parses a lock file from JSON text
    pub fn from_json(content: &str, origin: &Path) -> Result<Self, ProjectError> {
        serde_json::from_str(content)
            .map_err(|e| ProjectError::lock_file_invalid(origin, e.to_string()))
    }

    /// Reads the lock file of a project
    pub fn load(path: &Path, project: &Path) -> Result<Self, ProjectError> {
        if !path.exists() {
            return Err(ProjectError::lock_file_missing(project, path));
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| ProjectError::lock_file_invalid(path, e.to_string()))?;
        Self::from_json(&content, path)
    }

    /// Finds the target for a framework, ignoring runtime-specific targets
    pub fn target(&self, framework: &str) -> Option<LockFileTarget> {
        let (key, entries) = self
            .targets
            .iter()
            .filter(|(key, _)| !key.contains('/'))
            .find(|(key, _)| frameworks_match(key, framework))?;

        let libraries = entries
            .iter()
            .filter_map(|(id, entry)| parse_library(id, entry))
            .collect();

        Some(LockFileTarget {
            framework: key.clone(),
            libraries,
        })
    }
}

fn parse_library(id: &str, entry: &TargetLibraryEntry) -> Option<TargetLibrary> {
    let Some((name, version)) = id.split_once('/') else {
        warn!("Skipping malformed lock file library key '{}'", id);
        return None;
    };

    let version = match NuGetVersion::parse(version) {
        Ok(v) => v,
        Err(e) => {
            warn!("Skipping lock file library '{}': {}", id, e);
            return None;
        }
    };

    Some(TargetLibrary {
        name: name.to_string(),
        version,
        dependencies: entry
            .dependencies
            .iter()
            .map(|(n, r)| (n.clone(), r.clone()))
            .collect(),
    })
}

impl LockFileTarget {
    /// Looks up a library by case-insensitive name
    pub fn library(&self, name: &str) -> Option<&TargetLibrary> {
        self.libraries
            .iter()
            .find(|lib| lib.name.eq_ignore_ascii_case(name))
    }
}
