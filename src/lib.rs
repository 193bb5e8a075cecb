//! nuget-outdated - outdated dependency reports for .NET projects
//!
//! The library builds per-target-framework dependency trees from restore
//! artifacts, resolves the latest upstream version of each node from NuGet
//! v3 feeds and local folder feeds, and classifies every node as up to date,
//! outdated or unresolvable.

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod graph;
pub mod orchestrator;
pub mod output;
pub mod progress;
pub mod report;
pub mod resolve;
pub mod source;
