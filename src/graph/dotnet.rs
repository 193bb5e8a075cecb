//! Integration with the `dotnet` command line
//!
//! This module provides:
//! - Generation of the dependency graph spec via MSBuild
//! - Package restore for a single project
//!
//! Both operations sit behind traits so the builder can be exercised without
//! a .NET SDK installed.

use super::dg_spec::DependencyGraphSpec;
use crate::error::{GraphError, ProjectError};
use std::path::Path;
use std::process::{Command, Output};
use tracing::debug;

/// Produces the dependency graph spec for a project or solution
pub trait GraphSpecProvider {
    fn generate(&self, project: &Path) -> Result<DependencyGraphSpec, GraphError>;
}

/// Restores the packages of a single project
pub trait RestoreRunner {
    fn restore(&self, project: &Path) -> Result<(), ProjectError>;
}

/// Runner backed by the real `dotnet` executable
#[derive(Debug, Clone)]
pub struct DotnetCli {
    program: String,
}

impl Default for DotnetCli {
    fn default() -> Self {
        Self::new()
    }
}

impl DotnetCli {
    /// Create a runner that invokes `dotnet` from PATH
    pub fn new() -> Self {
        Self {
            program: "dotnet".to_string(),
        }
    }

    /// Create a runner for a specific executable
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, args: &[&str]) -> std::io::Result<Output> {
        debug!("Running {} {}", self.program, args.join(" "));
        Command::new(&self.program).args(args).output()
    }
}

/// Picks the most useful text out of a failed command
fn failure_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    // MSBuild prints its errors on stdout
    let text = if stderr.trim().is_empty() {
        stdout.trim()
    } else {
        stderr.trim()
    };
    if text.is_empty() {
        format!("exited with {}", output.status)
    } else {
        text.to_string()
    }
}

impl GraphSpecProvider for DotnetCli {
    fn generate(&self, project: &Path) -> Result<DependencyGraphSpec, GraphError> {
        let dir = tempfile::tempdir().map_err(|e| GraphError::unavailable(project, e.to_string()))?;
        let output_path = dir.path().join("restore-graph.json");

        let project_arg = project.to_string_lossy();
        let output_arg = format!("-p:RestoreGraphOutputPath={}", output_path.display());
        let output = self
            .run(&[
                "msbuild",
                project_arg.as_ref(),
                "-t:GenerateRestoreGraphFile",
                &output_arg,
            ])
            .map_err(|e| {
                GraphError::unavailable(project, format!("failed to execute {}: {}", self.program, e))
            })?;

        if !output.status.success() {
            return Err(GraphError::unavailable(project, failure_message(&output)));
        }
        if !output_path.exists() {
            return Err(GraphError::unavailable(
                project,
                "MSBuild did not write a dependency graph",
            ));
        }

        DependencyGraphSpec::from_file(&output_path)
    }
}

impl RestoreRunner for DotnetCli {
    fn restore(&self, project: &Path) -> Result<(), ProjectError> {
        let project_arg = project.to_string_lossy();
        let output = self
            .run(&["restore", project_arg.as_ref()])
            .map_err(|e| {
                ProjectError::restore_failed(project, format!("failed to execute {}: {}", self.program, e))
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(ProjectError::restore_failed(project, failure_message(&output)))
        }
    }
}
