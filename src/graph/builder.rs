//! Dependency tree construction
//!
//! Turns the dependency graph spec plus each project's lock file into
//! [`Project`] aggregates. Direct dependencies come from the graph spec in
//! declaration order; their resolved versions and transitive dependencies
//! come from the matching lock file target.

use super::assets::{LockFile, LockFileTarget, TargetLibrary};
use super::dg_spec::{DependencyGraphSpec, FrameworkSpec, ProjectSpec};
use super::dotnet::RestoreRunner;
use crate::domain::{Dependency, Project, TargetFramework, VersionRange};
use crate::error::{GraphError, ProjectError};
use tracing::{debug, info, warn};

/// Upper bound on the nodes of one direct-dependency tree
pub const MAX_TREE_NODES: usize = 10_000;

/// Upper bound on the levels below a direct dependency
///
/// Trees are walked recursively when classified and rendered, so a
/// self-referencing lock file must not produce an arbitrarily deep chain.
pub const MAX_TREE_DEPTH: usize = 128;

/// Options controlling how trees are built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Expand the dependencies of each resolved library
    pub include_transitive: bool,
    /// Maximum depth of a tree, direct dependencies being level 1
    pub max_depth: usize,
    /// Run restore before reading the lock file
    pub restore: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            include_transitive: false,
            max_depth: 1,
            restore: true,
        }
    }
}

/// Projects that were built, and the ones that failed
#[derive(Debug, Default)]
pub struct BuildOutcome {
    pub projects: Vec<Project>,
    pub failures: Vec<ProjectError>,
}

/// Builds dependency trees for every package-reference project of a graph
pub struct GraphBuilder<'a, R: RestoreRunner + ?Sized> {
    restorer: &'a R,
    options: BuildOptions,
}

impl<'a, R: RestoreRunner + ?Sized> GraphBuilder<'a, R> {
    pub fn new(restorer: &'a R, options: BuildOptions) -> Self {
        if options.include_transitive && options.max_depth > MAX_TREE_DEPTH {
            debug!(
                "Transitive depth {} exceeds {}; clamping",
                options.max_depth, MAX_TREE_DEPTH
            );
        }
        let options = BuildOptions {
            max_depth: options.max_depth.min(MAX_TREE_DEPTH),
            ..options
        };
        Self { restorer, options }
    }

    /// Builds all projects of the graph
    ///
    /// A failing project is recorded in [`BuildOutcome::failures`] and the
    /// remaining projects are still built.
    pub fn build_projects(&self, spec: &DependencyGraphSpec) -> Result<BuildOutcome, GraphError> {
        let candidates: Vec<&ProjectSpec> = spec.package_reference_projects().collect();
        if candidates.is_empty() {
            return Err(GraphError::NoRestorableProjects);
        }

        let skipped = spec.projects.len() - candidates.len();
        if skipped > 0 {
            debug!("Skipping {} project(s) not using package references", skipped);
        }

        let mut outcome = BuildOutcome::default();
        for project_spec in candidates {
            match self.build_project(project_spec) {
                Ok(project) => outcome.projects.push(project),
                Err(e) => {
                    warn!("{}", e);
                    outcome.failures.push(e);
                }
            }
        }
        Ok(outcome)
    }

    /// Restores one project and builds its trees from the lock file
    pub fn build_project(&self, spec: &ProjectSpec) -> Result<Project, ProjectError> {
        let project_path = &spec.restore.project_path;

        if self.options.restore {
            info!("Restoring {}", project_path.display());
            self.restorer.restore(project_path)?;
        }

        let assets_path = spec.assets_path();
        debug!("Reading lock file {}", assets_path.display());
        let lock_file = LockFile::load(&assets_path, project_path)?;

        Ok(self.build_from_lock_file(spec, &lock_file))
    }

    /// Builds a project from an already loaded lock file
    pub fn build_from_lock_file(&self, spec: &ProjectSpec, lock_file: &LockFile) -> Project {
        let mut project = Project::new(
            spec.name(),
            spec.restore.project_path.clone(),
            spec.sources(),
        );

        for (alias, framework) in &spec.frameworks {
            let target_framework = match lock_file.target(alias) {
                Some(target) => self.build_target_framework(alias, framework, &target),
                None => {
                    warn!(
                        "No lock file target matches {} in {}",
                        alias,
                        project.name
                    );
                    TargetFramework::new(alias.clone())
                }
            };
            project = project.with_target_framework(target_framework);
        }

        debug!(
            "Built {} with {} dependency node(s)",
            project.name,
            project.dependency_count()
        );
        project
    }

    fn build_target_framework(
        &self,
        alias: &str,
        framework: &FrameworkSpec,
        target: &LockFileTarget,
    ) -> TargetFramework {
        let mut target_framework = TargetFramework::new(alias);

        for (name, declared) in framework.dependencies.iter().filter(|(_, d)| d.is_package()) {
            let range = declared.version.as_deref().and_then(|raw| parse_range(name, raw));
            let library = target.library(name);
            let mut dependency = Dependency::new(name.clone(), range, library.map(|l| l.version.clone()))
                .with_auto_referenced(declared.auto_referenced);
            if dependency.is_unresolved() {
                debug!("{} is not in the lock file target {}", name, alias);
            }

            if self.options.include_transitive {
                if let Some(library) = library {
                    let mut budget = MAX_TREE_NODES - 1;
                    dependency.dependencies = self.expand(target, library, 1, &mut budget);
                    if budget == 0 {
                        warn!(
                            "Dependency tree of {} reached {} nodes; remaining dependencies are not shown",
                            name, MAX_TREE_NODES
                        );
                    }
                }
            }

            target_framework = target_framework.with_dependency(dependency);
        }

        target_framework
    }

    /// Expands the declared dependencies of a library found at `level`
    fn expand(
        &self,
        target: &LockFileTarget,
        library: &TargetLibrary,
        level: usize,
        budget: &mut usize,
    ) -> Vec<Dependency> {
        let mut children = Vec::with_capacity(library.dependencies.len());

        for (name, raw_range) in &library.dependencies {
            if *budget == 0 {
                break;
            }
            *budget -= 1;

            let child_library = target.library(name);
            let mut child = Dependency::new(
                name.clone(),
                parse_range(name, raw_range),
                child_library.map(|l| l.version.clone()),
            );

            if level < self.options.max_depth {
                if let Some(child_library) = child_library {
                    child.dependencies = self.expand(target, child_library, level + 1, budget);
                }
            }

            children.push(child);
        }

        children
    }
}

fn parse_range(name: &str, raw: &str) -> Option<VersionRange> {
    match VersionRange::parse(raw) {
        Ok(range) => Some(range),
        Err(e) => {
            warn!("Ignoring version range of {}: {}", name, e);
            None
        }
    }
}
