//! Project file discovery
//!
//! Accepts either a project file or a directory containing exactly one
//! C#, F# or Visual Basic project file.

use crate::error::GraphError;
use std::path::{Path, PathBuf};

/// Recognised project file extensions
pub const PROJECT_EXTENSIONS: &[&str] = &["csproj", "fsproj", "vbproj"];

/// Returns true if the path names a project file
pub fn is_project_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            PROJECT_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Resolves the CLI path to a single project file
pub fn discover_project(path: &Path) -> Result<PathBuf, GraphError> {
    if path.is_file() {
        return if is_project_file(path) {
            Ok(path.to_path_buf())
        } else {
            Err(GraphError::ProjectNotFound {
                path: path.to_path_buf(),
            })
        };
    }

    if !path.is_dir() {
        return Err(GraphError::ProjectNotFound {
            path: path.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(path).map_err(|_| GraphError::ProjectNotFound {
        path: path.to_path_buf(),
    })?;

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && is_project_file(p))
        .collect();
    candidates.sort();

    match candidates.len() {
        0 => Err(GraphError::ProjectNotFound {
            path: path.to_path_buf(),
        }),
        1 => Ok(candidates.remove(0)),
        count => Err(GraphError::AmbiguousProject {
            path: path.to_path_buf(),
            count,
        }),
    }
}

/// Directory holding the project, used to look for a config file
pub fn project_dir(project: &Path) -> &Path {
    match project.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
