//! Report aggregation
//!
//! Walks the dependency trees of every project, resolves the latest version
//! of each resolved node and classifies it. Resolution requests are
//! deduplicated and issued concurrently; trees are then rebuilt sequentially
//! so display order always matches declaration order.

use super::PackageFilter;
use crate::domain::{
    Dependency, DependencyReport, DependencyStatus, LatestLookup, Project, ProjectReport,
    TargetFramework, TargetFrameworkReport, UpgradeSeverity,
};
use crate::progress::Progress;
use crate::resolve::{RequestKey, ResolveRequest, UpstreamResolver};
use futures::future::join_all;
use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::debug;

/// Options controlling which nodes are reported
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Report dependencies added implicitly by the SDK
    pub include_auto_referenced: bool,
    /// Drop nodes that are up to date together with all their descendants
    pub outdated_only: bool,
    /// Name filters for direct dependencies
    pub filter: PackageFilter,
}

impl ReportOptions {
    /// Returns true if a direct dependency takes part in the walk
    pub fn walks(&self, dependency: &Dependency) -> bool {
        (self.include_auto_referenced || !dependency.auto_referenced)
            && self.filter.accepts(&dependency.name)
    }

    fn walked<'t>(
        &'t self,
        target_framework: &'t TargetFramework,
    ) -> impl Iterator<Item = &'t Dependency> + 't {
        target_framework
            .dependencies
            .iter()
            .filter(move |d| self.walks(d))
    }
}

/// Latest-version lookups by request identity
pub type Lookups = HashMap<RequestKey, LatestLookup>;

/// Classifies dependency trees into reports
pub struct ReportAggregator<'a> {
    resolver: &'a UpstreamResolver,
    options: ReportOptions,
}

impl<'a> ReportAggregator<'a> {
    pub fn new(resolver: &'a UpstreamResolver, options: ReportOptions) -> Self {
        Self { resolver, options }
    }

    /// Resolves and classifies every node of every project
    pub async fn report(&self, projects: &[Project]) -> Vec<ProjectReport> {
        let requests = self.collect_requests(projects);
        let lookups = self.resolve_all(requests, &Progress::disabled()).await;
        self.build_reports(projects, &lookups)
    }

    /// Collects one request per distinct resolved node, in walk order
    pub fn collect_requests(&self, projects: &[Project]) -> IndexMap<RequestKey, ResolveRequest> {
        let mut requests = IndexMap::new();
        for project in projects {
            for target_framework in &project.target_frameworks {
                for direct in self.options.walked(target_framework) {
                    collect_subtree(project, target_framework, direct, &mut requests);
                }
            }
        }
        debug!("{} distinct version lookups", requests.len());
        requests
    }

    /// Resolves all requests concurrently
    pub async fn resolve_all(
        &self,
        requests: IndexMap<RequestKey, ResolveRequest>,
        progress: &Progress,
    ) -> Lookups {
        let resolutions = requests.into_iter().map(|(key, request)| async move {
            progress.set_message(&format!("Resolving {}", request.package));
            let lookup = self.resolver.resolve_latest(&request).await;
            progress.inc();
            (key, lookup)
        });
        join_all(resolutions).await.into_iter().collect()
    }

    /// Builds the reports from resolved lookups
    pub fn build_reports(&self, projects: &[Project], lookups: &Lookups) -> Vec<ProjectReport> {
        projects
            .iter()
            .map(|project| ProjectReport {
                name: project.name.clone(),
                path: project.path.clone(),
                target_frameworks: project
                    .target_frameworks
                    .iter()
                    .map(|tf| self.build_target_framework(project, tf, lookups))
                    .collect(),
            })
            .collect()
    }

    fn build_target_framework(
        &self,
        project: &Project,
        target_framework: &TargetFramework,
        lookups: &Lookups,
    ) -> TargetFrameworkReport {
        let dependencies = self
            .options
            .walked(target_framework)
            .map(|d| classify(project, target_framework, d, 0, lookups))
            .filter_map(|node| {
                if self.options.outdated_only {
                    prune_up_to_date(node)
                } else {
                    Some(node)
                }
            })
            .collect();

        TargetFrameworkReport {
            name: target_framework.name.clone(),
            dependencies,
        }
    }
}

fn request_for(
    project: &Project,
    target_framework: &TargetFramework,
    dependency: &Dependency,
) -> Option<ResolveRequest> {
    let current = dependency.resolved_version.clone()?;
    Some(ResolveRequest {
        package: dependency.name.clone(),
        current,
        range: dependency.version_range.clone(),
        sources: project.sources.clone(),
        target_framework: target_framework.name.clone(),
        project_path: project.path.clone(),
    })
}

fn collect_subtree(
    project: &Project,
    target_framework: &TargetFramework,
    dependency: &Dependency,
    requests: &mut IndexMap<RequestKey, ResolveRequest>,
) {
    if let Some(request) = request_for(project, target_framework, dependency) {
        requests.entry(request.key()).or_insert(request);
    }
    for child in &dependency.dependencies {
        collect_subtree(project, target_framework, child, requests);
    }
}

/// Classifies a node and its subtree
fn classify(
    project: &Project,
    target_framework: &TargetFramework,
    dependency: &Dependency,
    depth: usize,
    lookups: &Lookups,
) -> DependencyReport {
    let children: Vec<DependencyReport> = dependency
        .dependencies
        .iter()
        .map(|c| classify(project, target_framework, c, depth + 1, lookups))
        .collect();
    let has_attention_descendant = children.iter().any(DependencyReport::needs_attention);

    let (latest, status, severity) = match dependency.resolved_version {
        None => (LatestLookup::NotChecked, DependencyStatus::Unresolvable, None),
        Some(ref resolved) => {
            let latest = request_for(project, target_framework, dependency)
                .and_then(|r| lookups.get(&r.key()).cloned())
                .unwrap_or(LatestLookup::NotChecked);
            let severity = latest
                .version()
                .filter(|newest| *newest > resolved)
                .map(|newest| UpgradeSeverity::from_versions(resolved, newest));
            match severity {
                Some(severity) => (latest, DependencyStatus::Outdated, Some(severity)),
                // no known latest still counts as current
                None => (latest, DependencyStatus::UpToDate, None),
            }
        }
    };

    DependencyReport {
        name: dependency.name.clone(),
        version_range: dependency.version_range.clone(),
        resolved_version: dependency.resolved_version.clone(),
        latest,
        status,
        severity,
        depth,
        auto_referenced: dependency.auto_referenced,
        has_attention_descendant,
        dependencies: children,
    }
}

/// Drops fully up-to-date subtrees, keeping ancestors of nodes that need attention
fn prune_up_to_date(mut node: DependencyReport) -> Option<DependencyReport> {
    if !node.needs_attention() {
        return None;
    }
    node.dependencies = node
        .dependencies
        .into_iter()
        .filter_map(prune_up_to_date)
        .collect();
    Some(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NuGetVersion, PrereleasePolicy, VersionLock};
    use crate::error::SourceError;
    use crate::resolve::{VersionInfo, VersionSelector};
    use crate::source::{HttpClient, PackageSource, SourceRepository};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    const FEED: &str = "https://feed.test/v3/index.json";

    /// In-memory feed with a call counter; every fetch yields to the runtime
    struct MemoryFeed {
        packages: HashMap<String, Vec<&'static str>>,
        calls: AtomicUsize,
    }

    impl MemoryFeed {
        fn new(packages: &[(&str, Vec<&'static str>)]) -> Arc<Self> {
            Arc::new(Self {
                packages: packages
                    .iter()
                    .map(|(name, versions)| (name.to_lowercase(), versions.clone()))
                    .collect(),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl PackageSource for MemoryFeed {
        fn uri(&self) -> &str {
            FEED
        }

        async fn fetch_versions(&self, package: &str) -> Result<Vec<VersionInfo>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            Ok(self
                .packages
                .get(&package.to_lowercase())
                .map(|versions| {
                    versions
                        .iter()
                        .map(|v| VersionInfo::undated(NuGetVersion::parse(v).unwrap()))
                        .collect()
                })
                .unwrap_or_default())
        }
    }

    fn resolver(feed: Arc<MemoryFeed>) -> UpstreamResolver {
        let repository = SourceRepository::new(HttpClient::new().unwrap()).with_source(feed);
        UpstreamResolver::new(
            repository,
            VersionSelector::new(PrereleasePolicy::Auto, VersionLock::None),
            4,
        )
    }

    fn dep(name: &str, version: Option<&str>) -> Dependency {
        Dependency::new(name, None, version.map(|v| NuGetVersion::parse(v).unwrap()))
    }

    fn project(dependencies: Vec<Dependency>) -> Project {
        let mut tf = TargetFramework::new("net8.0");
        for d in dependencies {
            tf = tf.with_dependency(d);
        }
        Project::new("App", "/src/App/App.csproj", vec![FEED.to_string()]).with_target_framework(tf)
    }

    fn names(nodes: &[DependencyReport]) -> Vec<&str> {
        nodes.iter().map(|n| n.name.as_str()).collect()
    }

    fn standard_feed() -> Arc<MemoryFeed> {
        MemoryFeed::new(&[
            ("A", vec!["1.0.0"]),
            ("B", vec!["1.0.0", "1.1.0"]),
            ("C", vec!["2.0.0"]),
        ])
    }

    #[tokio::test]
    async fn test_classification() {
        let feed = standard_feed();
        let resolver = resolver(feed);
        let aggregator = ReportAggregator::new(&resolver, ReportOptions::default());

        let projects = vec![project(vec![
            dep("A", Some("1.0.0")).with_dependency(dep("B", Some("1.0.0"))),
            dep("C", Some("2.0.0")),
            dep("Gone", None),
        ])];
        let reports = aggregator.report(&projects).await;
        let nodes = &reports[0].target_frameworks[0].dependencies;

        assert_eq!(names(nodes), vec!["A", "C", "Gone"]);
        assert_eq!(nodes[0].status, DependencyStatus::UpToDate);
        assert!(nodes[0].has_attention_descendant);

        let b = &nodes[0].dependencies[0];
        assert_eq!(b.status, DependencyStatus::Outdated);
        assert_eq!(b.severity, Some(UpgradeSeverity::Minor));
        assert_eq!(b.depth, 1);
        assert_eq!(b.latest.version().unwrap().to_string(), "1.1.0");

        assert_eq!(nodes[1].status, DependencyStatus::UpToDate);
        assert!(!nodes[1].needs_attention());

        assert_eq!(nodes[2].status, DependencyStatus::Unresolvable);
        assert_eq!(nodes[2].latest, LatestLookup::NotChecked);
    }

    #[tokio::test]
    async fn test_outdated_only_keeps_ancestors() {
        let feed = standard_feed();
        let resolver = resolver(feed);
        let options = ReportOptions {
            outdated_only: true,
            ..Default::default()
        };
        let aggregator = ReportAggregator::new(&resolver, options);

        let projects = vec![project(vec![
            dep("A", Some("1.0.0")).with_dependency(dep("B", Some("1.0.0"))),
            dep("C", Some("2.0.0")),
        ])];
        let reports = aggregator.report(&projects).await;
        let nodes = &reports[0].target_frameworks[0].dependencies;

        assert_eq!(names(nodes), vec!["A"]);
        assert_eq!(names(&nodes[0].dependencies), vec!["B"]);
    }

    #[tokio::test]
    async fn test_outdated_only_drops_current_siblings_of_outdated_child() {
        let feed = standard_feed();
        let resolver = resolver(feed);
        let options = ReportOptions {
            outdated_only: true,
            ..Default::default()
        };
        let aggregator = ReportAggregator::new(&resolver, options);

        let projects = vec![project(vec![dep("A", Some("1.0.0"))
            .with_dependency(dep("C", Some("2.0.0")))
            .with_dependency(dep("B", Some("1.0.0")))])];
        let reports = aggregator.report(&projects).await;
        let a = &reports[0].target_frameworks[0].dependencies[0];
        assert_eq!(names(&a.dependencies), vec!["B"]);
    }

    #[tokio::test]
    async fn test_auto_referenced_excluded_by_default() {
        let feed = MemoryFeed::new(&[("Microsoft.NETCore.App", vec!["9.0.0"])]);
        let resolver = resolver(feed.clone());
        let aggregator = ReportAggregator::new(&resolver, ReportOptions::default());

        let projects = vec![project(vec![
            dep("Microsoft.NETCore.App", Some("2.1.0")).with_auto_referenced(true)
        ])];
        let reports = aggregator.report(&projects).await;

        assert!(reports[0].nodes().all(|n| n.name != "Microsoft.NETCore.App"));
        assert_eq!(feed.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_auto_referenced_included_on_request() {
        let feed = MemoryFeed::new(&[("Microsoft.NETCore.App", vec!["9.0.0"])]);
        let resolver = resolver(feed);
        let options = ReportOptions {
            include_auto_referenced: true,
            ..Default::default()
        };
        let aggregator = ReportAggregator::new(&resolver, options);

        let projects = vec![project(vec![
            dep("Microsoft.NETCore.App", Some("2.1.0")).with_auto_referenced(true)
        ])];
        let reports = aggregator.report(&projects).await;
        let node = &reports[0].target_frameworks[0].dependencies[0];
        assert!(node.auto_referenced);
        assert_eq!(node.status, DependencyStatus::Outdated);
        assert_eq!(node.severity, Some(UpgradeSeverity::Major));
    }

    #[tokio::test]
    async fn test_filter_drops_subtree() {
        let feed = standard_feed();
        let resolver = resolver(feed.clone());
        let options = ReportOptions {
            filter: PackageFilter::new().with_exclude(vec!["a".to_string()]),
            ..Default::default()
        };
        let aggregator = ReportAggregator::new(&resolver, options);

        let projects = vec![project(vec![
            dep("A", Some("1.0.0")).with_dependency(dep("B", Some("1.0.0"))),
            dep("C", Some("2.0.0")),
        ])];
        let reports = aggregator.report(&projects).await;

        let all: Vec<_> = reports[0].nodes().map(|n| n.name.as_str()).collect();
        assert_eq!(all, vec!["C"]);
        assert_eq!(feed.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_requests_deduplicated_across_projects() {
        let feed = standard_feed();
        let resolver = resolver(feed.clone());
        let aggregator = ReportAggregator::new(&resolver, ReportOptions::default());

        let projects = vec![
            project(vec![dep("B", Some("1.0.0"))]),
            project(vec![dep("b", Some("1.0.0")), dep("B", Some("1.1.0"))]),
        ];
        let requests = aggregator.collect_requests(&projects);
        assert_eq!(requests.len(), 2);

        let reports = aggregator.report(&projects).await;
        assert_eq!(reports.len(), 2);
        // one listing per package, regardless of how many requests use it
        assert_eq!(feed.calls.load(Ordering::SeqCst), 1);
        assert_eq!(reports[1].target_frameworks[0].dependencies[1].status, DependencyStatus::UpToDate);
    }

    #[tokio::test]
    async fn test_one_listing_for_package_on_many_frameworks() {
        let feed = standard_feed();
        let resolver = resolver(feed.clone());
        let aggregator = ReportAggregator::new(&resolver, ReportOptions::default());

        let mut project = Project::new("App", "/src/App/App.csproj", vec![FEED.to_string()]);
        for tf in ["net6.0", "net7.0", "net8.0", "netstandard2.0"] {
            project = project.with_target_framework(
                TargetFramework::new(tf).with_dependency(dep("B", Some("1.0.0"))),
            );
        }
        let reports = aggregator.report(&[project]).await;

        assert!(reports[0]
            .nodes()
            .all(|n| n.status == DependencyStatus::Outdated));
        assert_eq!(feed.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_latest_is_up_to_date() {
        let feed = MemoryFeed::new(&[]);
        let resolver = resolver(feed);
        let aggregator = ReportAggregator::new(&resolver, ReportOptions::default());

        let reports = aggregator.report(&[project(vec![dep("Private", Some("1.0.0"))])]).await;
        let node = &reports[0].target_frameworks[0].dependencies[0];
        assert_eq!(node.status, DependencyStatus::UpToDate);
        assert_eq!(node.latest, LatestLookup::NoMatchingVersion);
    }
}
