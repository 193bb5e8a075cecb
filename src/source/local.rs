//! Local folder feed adapter
//!
//! Supports both layouts NuGet writes to folders:
//! - hierarchical: `<root>/<id-lower>/<version>/`
//! - flat: `<root>/<Id>.<version>.nupkg`

use super::PackageSource;
use crate::domain::NuGetVersion;
use crate::error::SourceError;
use crate::resolve::VersionInfo;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Local folder feed adapter
pub struct LocalFolderSource {
    uri: String,
    root: PathBuf,
}

impl LocalFolderSource {
    pub fn new(uri: impl Into<String>) -> Self {
        let uri = uri.into();
        let root = PathBuf::from(uri.strip_prefix("file://").unwrap_or(&uri));
        Self { uri, root }
    }

    fn io_error(&self, path: &Path, source: std::io::Error) -> SourceError {
        SourceError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    async fn hierarchical_versions(&self, package: &str) -> Result<Vec<NuGetVersion>, SourceError> {
        let dir = self.root.join(package.to_lowercase());
        if !tokio::fs::metadata(&dir).await.is_ok_and(|m| m.is_dir()) {
            return Ok(Vec::new());
        }

        let mut versions = Vec::new();
        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .map_err(|e| self.io_error(&dir, e))?;
        while let Some(entry) = entries.next_entry().await.map_err(|e| self.io_error(&dir, e))? {
            let is_dir = entry.file_type().await.is_ok_and(|t| t.is_dir());
            if !is_dir {
                continue;
            }
            if let Ok(version) = NuGetVersion::parse(&entry.file_name().to_string_lossy()) {
                versions.push(version);
            }
        }
        Ok(versions)
    }

    async fn flat_versions(&self, package: &str) -> Result<Vec<NuGetVersion>, SourceError> {
        let prefix = format!("{}.", package.to_lowercase());
        let mut versions = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.root)
            .await
            .map_err(|e| self.io_error(&self.root, e))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| self.io_error(&self.root, e))?
        {
            let name = entry.file_name().to_string_lossy().to_lowercase();
            let Some(stem) = name.strip_suffix(".nupkg") else {
                continue;
            };
            // symbol packages share the naming scheme
            if stem.ends_with(".symbols") {
                continue;
            }
            // Serilog.Sinks.Console.1.0.0 also starts with "serilog." but fails to parse
            if let Some(Ok(version)) = stem.strip_prefix(&prefix).map(NuGetVersion::parse) {
                versions.push(version);
            }
        }
        Ok(versions)
    }
}

#[async_trait]
impl PackageSource for LocalFolderSource {
    fn uri(&self) -> &str {
        &self.uri
    }

    async fn fetch_versions(&self, package: &str) -> Result<Vec<VersionInfo>, SourceError> {
        if !tokio::fs::metadata(&self.root).await.is_ok_and(|m| m.is_dir()) {
            return Err(self.io_error(
                &self.root,
                std::io::Error::new(std::io::ErrorKind::NotFound, "feed folder does not exist"),
            ));
        }

        let mut versions = self.hierarchical_versions(package).await?;
        versions.extend(self.flat_versions(package).await?);
        versions.sort();
        versions.dedup();
        debug!("{} has {} version(s) in {}", package, versions.len(), self.uri);

        Ok(versions.into_iter().map(VersionInfo::undated).collect())
    }
}
