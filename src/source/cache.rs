//! Per-run memoization of source lookups
//!
//! Keyed by source URI and lower-cased package name. Failures are stored as
//! well so that a failing source is asked only once per package. Each key
//! holds a cell that concurrent lookups share, so a fetch in flight is awaited
//! rather than repeated.

use crate::resolve::VersionInfo;
use dashmap::DashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Cache key for a version listing
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct CacheKey {
    source_uri: String,
    package: String,
}

impl CacheKey {
    fn new(source_uri: &str, package: &str) -> Self {
        Self {
            source_uri: source_uri.to_string(),
            package: package.to_lowercase(),
        }
    }
}

/// A memoized listing, or the message of the failure that produced none
pub type CachedVersions = Result<Arc<Vec<VersionInfo>>, String>;

/// Thread-safe version listing cache
#[derive(Debug, Default)]
pub(crate) struct VersionCache {
    entries: DashMap<CacheKey, Arc<OnceCell<CachedVersions>>>,
}

impl VersionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the memoized listing, running `fetch` only for the first caller
    pub async fn get_or_fetch<F, Fut>(
        &self,
        source_uri: &str,
        package: &str,
        fetch: F,
    ) -> CachedVersions
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = CachedVersions>,
    {
        // the shard lock is released before awaiting
        let cell = self
            .entries
            .entry(CacheKey::new(source_uri, package))
            .or_default()
            .value()
            .clone();
        cell.get_or_init(fetch).await.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
