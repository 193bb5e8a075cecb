//! Dependency graph construction from restore artifacts
//!
//! - `discovery`: resolve the CLI path to a project file
//! - `dotnet`: generate the dependency graph spec and run restore
//! - `dg_spec`: dependency graph spec model
//! - `assets`: lock file model
//! - `framework`: target framework name matching
//! - `builder`: build per-project dependency trees

pub mod assets;
pub mod builder;
pub mod dg_spec;
pub mod discovery;
pub mod dotnet;
pub mod framework;

pub use assets::{LockFile, LockFileTarget, TargetLibrary};
pub use builder::{BuildOptions, BuildOutcome, GraphBuilder, MAX_TREE_DEPTH, MAX_TREE_NODES};
pub use dg_spec::{DependencyGraphSpec, ProjectSpec, ProjectStyle};
pub use discovery::{discover_project, project_dir};
pub use dotnet::{DotnetCli, GraphSpecProvider, RestoreRunner};
pub use framework::{frameworks_match, FrameworkName};
