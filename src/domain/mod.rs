//! Core domain models for nuget-outdated
//!
//! This module contains the fundamental types used throughout the application:
//! - NuGet versions and version ranges
//! - Prerelease and version lock policies
//! - Projects, target frameworks and dependency trees
//! - Report types produced by the analysis

mod dependency;
mod policy;
mod project;
mod report;
mod version;
mod version_range;

pub use dependency::Dependency;
pub use policy::{PrereleasePolicy, VersionLock};
pub use project::{Project, TargetFramework};
pub use report::{
    DependencyReport, DependencyStatus, LatestLookup, ProjectReport, ReportSummary,
    TargetFrameworkReport, UpgradeSeverity,
};
pub use version::NuGetVersion;
pub use version_range::VersionRange;
