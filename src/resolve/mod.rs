//! Upstream version resolution
//!
//! This module provides:
//! - Version info as reported by package sources
//! - Latest-version selection under prerelease, lock, range and age filters
//! - A resolver that queries every configured source with bounded concurrency

mod select;
mod version_info;

pub use select::VersionSelector;
pub use version_info::VersionInfo;

use crate::domain::{LatestLookup, NuGetVersion, VersionRange};
use crate::source::SourceRepository;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::debug;

/// Default number of concurrent resolutions
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Everything needed to resolve the latest version of one node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveRequest {
    pub package: String,
    pub current: NuGetVersion,
    pub range: Option<VersionRange>,
    pub sources: Vec<String>,
    pub target_framework: String,
    pub project_path: PathBuf,
}

/// Identity of a request for deduplication
///
/// The same package at the same version, range and sources resolves
/// identically, so the project path is not part of the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    package: String,
    target_framework: String,
    current: NuGetVersion,
    range: Option<String>,
    sources: Vec<String>,
}

impl ResolveRequest {
    pub fn key(&self) -> RequestKey {
        RequestKey {
            package: self.package.to_lowercase(),
            target_framework: self.target_framework.to_lowercase(),
            current: self.current.clone(),
            range: self.range.as_ref().map(|r| r.to_string()),
            sources: self.sources.clone(),
        }
    }
}

/// Resolves latest versions against package sources
pub struct UpstreamResolver {
    repository: SourceRepository,
    selector: VersionSelector,
    semaphore: Arc<Semaphore>,
}

impl UpstreamResolver {
    pub fn new(repository: SourceRepository, selector: VersionSelector, concurrency: usize) -> Self {
        Self {
            repository,
            selector,
            semaphore: Arc::new(Semaphore::new(concurrency.max(1))),
        }
    }

    /// Resolves the latest eligible version of a package
    ///
    /// A failing source is skipped. The lookup is `SourcesUnreachable` only
    /// when no source answered, and `NoMatchingVersion` when sources answered
    /// but nothing passed the filters.
    pub async fn resolve_latest(&self, request: &ResolveRequest) -> LatestLookup {
        // the semaphore is never closed
        let _permit = self.semaphore.acquire().await.ok();

        if request.sources.is_empty() {
            return LatestLookup::SourcesUnreachable {
                errors: vec!["no package sources configured".to_string()],
            };
        }

        let mut candidates = Vec::new();
        let mut errors = Vec::new();
        for uri in &request.sources {
            match self.repository.versions(uri, &request.package).await {
                Ok(versions) => candidates.extend(versions.iter().cloned()),
                Err(message) => errors.push(message),
            }
        }

        if errors.len() == request.sources.len() {
            return LatestLookup::SourcesUnreachable { errors };
        }

        match self
            .selector
            .select(&request.current, request.range.as_ref(), &candidates)
        {
            Some(latest) => {
                debug!(
                    "{} {} ({}): latest is {}",
                    request.package, request.current, request.target_framework, latest.version
                );
                LatestLookup::Found {
                    version: latest.version.clone(),
                    published: latest.published,
                }
            }
            None => LatestLookup::NoMatchingVersion,
        }
    }
}
