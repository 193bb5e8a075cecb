//! Package sources for listing published versions
//!
//! This module provides:
//! - HTTP client shared foundation with retry logic
//! - NuGet v3 feed adapter
//! - Local folder feed adapter
//! - A repository that creates adapters on demand and memoizes their answers

mod cache;
mod client;
mod local;
mod nuget_v3;

pub use cache::CachedVersions;
pub use client::HttpClient;
pub use local::LocalFolderSource;
pub use nuget_v3::NuGetV3Source;

use crate::error::SourceError;
use crate::resolve::VersionInfo;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Trait for package sources
#[async_trait]
pub trait PackageSource: Send + Sync {
    /// URI the source was configured with
    fn uri(&self) -> &str;

    /// Fetch the listed versions of a package
    ///
    /// A package the source does not know yields an empty list.
    async fn fetch_versions(&self, package: &str) -> Result<Vec<VersionInfo>, SourceError>;
}

/// Create a source adapter for a configured URI
pub fn create_source(uri: &str, client: HttpClient) -> Arc<dyn PackageSource> {
    let lower = uri.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Arc::new(NuGetV3Source::new(uri, client))
    } else {
        Arc::new(LocalFolderSource::new(uri))
    }
}

/// Source adapters by URI, with a shared listing cache
pub struct SourceRepository {
    client: HttpClient,
    sources: DashMap<String, Arc<dyn PackageSource>>,
    cache: cache::VersionCache,
}

impl SourceRepository {
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            sources: DashMap::new(),
            cache: cache::VersionCache::new(),
        }
    }

    /// Registers a prebuilt adapter under its URI (builder pattern)
    pub fn with_source(self, source: Arc<dyn PackageSource>) -> Self {
        self.sources.insert(source.uri().to_string(), source);
        self
    }

    fn source(&self, uri: &str) -> Arc<dyn PackageSource> {
        self.sources
            .entry(uri.to_string())
            .or_insert_with(|| create_source(uri, self.client.clone()))
            .value()
            .clone()
    }

    /// Lists a package's versions on one source, consulting the cache first
    ///
    /// Concurrent lookups of the same listing share a single fetch.
    pub async fn versions(&self, uri: &str, package: &str) -> CachedVersions {
        self.cache
            .get_or_fetch(uri, package, || async {
                debug!("Fetching {} from {}", package, uri);
                match self.source(uri).fetch_versions(package).await {
                    Ok(versions) => {
                        debug!("{} listing(s) cached", self.cache.len());
                        Ok(Arc::new(versions))
                    }
                    Err(e) => {
                        warn!("Skipping source {} for {}: {}", uri, package, e);
                        Err(e.to_string())
                    }
                }
            })
            .await
    }
}
