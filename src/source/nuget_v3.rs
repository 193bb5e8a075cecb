//! NuGet v3 feed adapter
//!
//! Lists package versions through the registration resource of a v3 feed.
//! Service index: `<feed>/index.json`, registration: `<base><id-lower>/index.json`

use super::{HttpClient, PackageSource};
use crate::domain::NuGetVersion;
use crate::error::SourceError;
use crate::resolve::VersionInfo;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

/// Registration resource types in order of preference
const REGISTRATION_TYPES: &[&str] = &[
    "RegistrationsBaseUrl/3.6.0",
    "RegistrationsBaseUrl/3.4.0",
    "RegistrationsBaseUrl",
];

/// NuGet v3 feed adapter
pub struct NuGetV3Source {
    index_url: String,
    client: HttpClient,
    registration_base: OnceCell<String>,
}

#[derive(Debug, Deserialize)]
struct ServiceIndex {
    #[serde(default)]
    resources: Vec<ServiceResource>,
}

#[derive(Debug, Deserialize)]
struct ServiceResource {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct RegistrationIndex {
    #[serde(default)]
    items: Vec<RegistrationPage>,
}

#[derive(Debug, Deserialize)]
struct RegistrationPage {
    #[serde(rename = "@id")]
    id: String,
    /// Absent when the page must be fetched separately
    #[serde(default)]
    items: Option<Vec<RegistrationLeaf>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegistrationLeaf {
    catalog_entry: CatalogEntry,
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    version: String,
    #[serde(default)]
    listed: Option<bool>,
    #[serde(default)]
    published: Option<String>,
}

impl NuGetV3Source {
    /// Create an adapter for the feed whose service index is at `index_url`
    pub fn new(index_url: impl Into<String>, client: HttpClient) -> Self {
        Self {
            index_url: index_url.into(),
            client,
            registration_base: OnceCell::new(),
        }
    }

    /// Registration base URL, read from the service index on first use
    async fn registration_base(&self) -> Result<&str, SourceError> {
        let base = self
            .registration_base
            .get_or_try_init(|| async {
                debug!("Fetching service index {}", self.index_url);
                let index: ServiceIndex = self
                    .client
                    .get_json(&self.index_url, "", &self.index_url)
                    .await
                    .map_err(|e| {
                        if e.is_not_found() {
                            SourceError::invalid_response("", &self.index_url, "service index not found")
                        } else {
                            e
                        }
                    })?;
                select_registration_base(&index).ok_or_else(|| SourceError::MissingResource {
                    source_uri: self.index_url.clone(),
                    resource: "RegistrationsBaseUrl".to_string(),
                })
            })
            .await?;
        Ok(base.as_str())
    }

    fn build_url(base: &str, package: &str) -> String {
        format!("{}{}/index.json", base, package.to_lowercase())
    }
}

/// Picks the preferred registration resource and normalizes its trailing slash
fn select_registration_base(index: &ServiceIndex) -> Option<String> {
    REGISTRATION_TYPES.iter().find_map(|kind| {
        index
            .resources
            .iter()
            .find(|r| r.kind == *kind)
            .map(|r| {
                if r.id.ends_with('/') {
                    r.id.clone()
                } else {
                    format!("{}/", r.id)
                }
            })
    })
}

fn to_version_info(package: &str, entry: &CatalogEntry) -> Option<VersionInfo> {
    if entry.listed == Some(false) {
        return None;
    }
    let version = match NuGetVersion::parse(&entry.version) {
        Ok(v) => v,
        Err(e) => {
            warn!("Ignoring version of {}: {}", package, e);
            return None;
        }
    };
    let published = entry
        .published
        .as_deref()
        .and_then(|s| s.parse::<DateTime<Utc>>().ok());
    Some(VersionInfo { version, published })
}

#[async_trait]
impl PackageSource for NuGetV3Source {
    fn uri(&self) -> &str {
        &self.index_url
    }

    async fn fetch_versions(&self, package: &str) -> Result<Vec<VersionInfo>, SourceError> {
        let base = self.registration_base().await?;
        let url = Self::build_url(base, package);

        let index: RegistrationIndex = match self.client.get_json(&url, package, &self.index_url).await {
            Ok(index) => index,
            Err(e) if e.is_not_found() => {
                debug!("{} is not on {}", package, self.index_url);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let mut versions = Vec::new();
        for page in index.items {
            let leaves = match page.items {
                Some(items) => items,
                None => {
                    let page: RegistrationPage =
                        self.client.get_json(&page.id, package, &self.index_url).await?;
                    page.items.unwrap_or_default()
                }
            };
            versions.extend(
                leaves
                    .iter()
                    .filter_map(|leaf| to_version_info(package, &leaf.catalog_entry)),
            );
        }

        versions.sort();
        versions.dedup_by(|a, b| a.version == b.version);
        Ok(versions)
    }
}
