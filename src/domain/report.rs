//! Outdated report types
//!
//! A report mirrors the dependency trees of the analysed projects, with each
//! node carrying its classification and the outcome of the latest-version lookup.

use super::{NuGetVersion, VersionRange};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Classification of a single dependency node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyStatus {
    /// Resolved version is the latest eligible one, or no latest could be determined
    UpToDate,
    /// A newer eligible version exists
    Outdated,
    /// Restore did not record a version for this package
    Unresolvable,
}

impl DependencyStatus {
    /// Returns true for statuses that must stay visible in outdated-only views
    pub fn needs_attention(&self) -> bool {
        !matches!(self, DependencyStatus::UpToDate)
    }
}

impl fmt::Display for DependencyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencyStatus::UpToDate => write!(f, "up-to-date"),
            DependencyStatus::Outdated => write!(f, "outdated"),
            DependencyStatus::Unresolvable => write!(f, "unresolvable"),
        }
    }
}

/// Outcome of looking up the latest version of a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LatestLookup {
    /// Lookup was not attempted because the resolved version is unknown
    NotChecked,
    /// Latest eligible version
    Found {
        version: NuGetVersion,
        #[serde(skip_serializing_if = "Option::is_none")]
        published: Option<DateTime<Utc>>,
    },
    /// Sources answered, but nothing satisfied the range, lock and prerelease policies
    NoMatchingVersion,
    /// Every configured source failed
    SourcesUnreachable { errors: Vec<String> },
}

impl LatestLookup {
    /// The latest version, if one was found
    pub fn version(&self) -> Option<&NuGetVersion> {
        match self {
            LatestLookup::Found { version, .. } => Some(version),
            _ => None,
        }
    }
}

/// Size of the jump from the resolved to the latest version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpgradeSeverity {
    /// Major version change (breaking)
    Major,
    /// Minor version change (features)
    Minor,
    /// Patch, revision or prerelease change (fixes)
    Patch,
}

impl UpgradeSeverity {
    /// Determine the severity between two versions
    pub fn from_versions(resolved: &NuGetVersion, latest: &NuGetVersion) -> Self {
        if resolved.major() != latest.major() {
            UpgradeSeverity::Major
        } else if resolved.minor() != latest.minor() {
            UpgradeSeverity::Minor
        } else {
            UpgradeSeverity::Patch
        }
    }

    /// Get the plain label
    pub fn label(&self) -> &'static str {
        match self {
            UpgradeSeverity::Major => "major",
            UpgradeSeverity::Minor => "minor",
            UpgradeSeverity::Patch => "patch",
        }
    }
}

/// A classified dependency node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyReport {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_range: Option<VersionRange>,
    pub resolved_version: Option<NuGetVersion>,
    pub latest: LatestLookup,
    pub status: DependencyStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<UpgradeSeverity>,
    /// Distance from the owning direct dependency (0 for direct dependencies)
    pub depth: usize,
    pub auto_referenced: bool,
    /// Whether some descendant is outdated or unresolvable
    pub has_attention_descendant: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<DependencyReport>,
}

impl DependencyReport {
    /// Returns true if this node or any descendant needs attention
    pub fn needs_attention(&self) -> bool {
        self.status.needs_attention() || self.has_attention_descendant
    }

    /// Iterates this node and every descendant, depth first
    pub fn iter(&self) -> Box<dyn Iterator<Item = &DependencyReport> + '_> {
        Box::new(std::iter::once(self).chain(self.dependencies.iter().flat_map(|d| d.iter())))
    }
}

/// Report for one target framework of a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetFrameworkReport {
    pub name: String,
    pub dependencies: Vec<DependencyReport>,
}

impl TargetFrameworkReport {
    /// Iterates every reported node of this target framework
    pub fn nodes(&self) -> impl Iterator<Item = &DependencyReport> {
        self.dependencies.iter().flat_map(|d| d.iter())
    }
}

/// Report for one project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectReport {
    pub name: String,
    pub path: PathBuf,
    pub target_frameworks: Vec<TargetFrameworkReport>,
}

impl ProjectReport {
    /// Iterates every reported node of this project
    pub fn nodes(&self) -> impl Iterator<Item = &DependencyReport> {
        self.target_frameworks.iter().flat_map(|tf| tf.nodes())
    }

    /// Returns true if nothing in this project needs attention
    pub fn is_up_to_date(&self) -> bool {
        self.nodes().all(|n| !n.status.needs_attention())
    }

    /// Counts the nodes with the given status
    pub fn count(&self, status: DependencyStatus) -> usize {
        self.nodes().filter(|n| n.status == status).count()
    }
}

/// Overall counts across all project reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ReportSummary {
    pub projects: usize,
    pub dependencies: usize,
    pub outdated: usize,
    pub unresolvable: usize,
}

impl ReportSummary {
    /// Computes the summary of a set of project reports
    pub fn from_reports(reports: &[ProjectReport]) -> Self {
        let mut summary = Self {
            projects: reports.len(),
            ..Self::default()
        };
        for node in reports.iter().flat_map(|r| r.nodes()) {
            summary.dependencies += 1;
            match node.status {
                DependencyStatus::Outdated => summary.outdated += 1,
                DependencyStatus::Unresolvable => summary.unresolvable += 1,
                DependencyStatus::UpToDate => {}
            }
        }
        summary
    }

    /// Returns true if at least one node is outdated
    pub fn has_outdated(&self) -> bool {
        self.outdated > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> NuGetVersion {
        NuGetVersion::parse(s).unwrap()
    }

    fn node(name: &str, status: DependencyStatus, children: Vec<DependencyReport>) -> DependencyReport {
        DependencyReport {
            name: name.to_string(),
            version_range: None,
            resolved_version: Some(v("1.0.0")),
            latest: LatestLookup::NoMatchingVersion,
            status,
            severity: None,
            depth: 0,
            auto_referenced: false,
            has_attention_descendant: children.iter().any(|c| c.needs_attention()),
            dependencies: children,
        }
    }

    #[test]
    fn test_upgrade_severity() {
        assert_eq!(
            UpgradeSeverity::from_versions(&v("1.0.0"), &v("2.0.0")),
            UpgradeSeverity::Major
        );
        assert_eq!(
            UpgradeSeverity::from_versions(&v("1.0.0"), &v("1.1.0")),
            UpgradeSeverity::Minor
        );
        assert_eq!(
            UpgradeSeverity::from_versions(&v("1.0.0"), &v("1.0.1")),
            UpgradeSeverity::Patch
        );
        assert_eq!(
            UpgradeSeverity::from_versions(&v("1.0.0-beta"), &v("1.0.0")),
            UpgradeSeverity::Patch
        );
    }

    #[test]
    fn test_status_needs_attention() {
        assert!(!DependencyStatus::UpToDate.needs_attention());
        assert!(DependencyStatus::Outdated.needs_attention());
        assert!(DependencyStatus::Unresolvable.needs_attention());
    }

    #[test]
    fn test_iter_visits_all_descendants() {
        let tree = node(
            "A",
            DependencyStatus::UpToDate,
            vec![node(
                "B",
                DependencyStatus::UpToDate,
                vec![node("C", DependencyStatus::Outdated, vec![])],
            )],
        );
        let names: Vec<_> = tree.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert!(tree.needs_attention());
    }

    #[test]
    fn test_summary_counts() {
        let report = ProjectReport {
            name: "App".into(),
            path: PathBuf::from("App.csproj"),
            target_frameworks: vec![TargetFrameworkReport {
                name: "net8.0".into(),
                dependencies: vec![
                    node("A", DependencyStatus::Outdated, vec![]),
                    node(
                        "B",
                        DependencyStatus::UpToDate,
                        vec![node("C", DependencyStatus::Unresolvable, vec![])],
                    ),
                ],
            }],
        };
        assert!(!report.is_up_to_date());
        assert_eq!(report.count(DependencyStatus::Outdated), 1);

        let summary = ReportSummary::from_reports(&[report]);
        assert_eq!(summary.projects, 1);
        assert_eq!(summary.dependencies, 3);
        assert_eq!(summary.outdated, 1);
        assert_eq!(summary.unresolvable, 1);
        assert!(summary.has_outdated());
    }

    #[test]
    fn test_latest_lookup_version() {
        let found = LatestLookup::Found {
            version: v("2.0.0"),
            published: None,
        };
        assert_eq!(found.version(), Some(&v("2.0.0")));
        assert_eq!(LatestLookup::NoMatchingVersion.version(), None);
    }

    #[test]
    fn test_serialize_status() {
        let json = serde_json::to_string(&DependencyStatus::UpToDate).unwrap();
        assert_eq!(json, "\"up_to_date\"");
    }
}
