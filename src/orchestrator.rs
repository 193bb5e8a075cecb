//! Run orchestration
//!
//! Coordinates one analysis: generate the dependency graph spec, restore
//! and build the dependency trees, resolve latest versions, then classify.
//! Graph generation and restores are blocking and run before any version
//! lookup starts.

use crate::config::OutdatedOptions;
use crate::domain::{ProjectReport, ReportSummary};
use crate::error::{GraphError, ProjectError, SourceError};
use crate::graph::{DotnetCli, GraphBuilder, GraphSpecProvider, RestoreRunner};
use crate::progress::Progress;
use crate::report::ReportAggregator;
use crate::resolve::UpstreamResolver;
use crate::source::{HttpClient, PackageSource, SourceRepository};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Result of a completed run
#[derive(Debug)]
pub struct RunResult {
    /// Reports in project order
    pub reports: Vec<ProjectReport>,
    pub summary: ReportSummary,
    /// Projects that could not be analysed
    pub failures: Vec<ProjectError>,
}

impl RunResult {
    /// Returns true if the process should signal outdated dependencies
    pub fn should_fail(&self, options: &OutdatedOptions) -> bool {
        options.fail_on_updates && self.summary.has_outdated()
    }
}

/// Orchestrator for one analysis run
pub struct Orchestrator {
    options: Arc<OutdatedOptions>,
    graph: Box<dyn GraphSpecProvider>,
    restorer: Box<dyn RestoreRunner>,
    client: HttpClient,
    /// Adapters registered ahead of URI-based creation
    sources: Vec<Arc<dyn PackageSource>>,
}

impl Orchestrator {
    /// Create an orchestrator driving the dotnet CLI
    pub fn new(options: Arc<OutdatedOptions>) -> Result<Self, SourceError> {
        Ok(Self::with_client(options, HttpClient::new()?))
    }

    pub fn with_client(options: Arc<OutdatedOptions>, client: HttpClient) -> Self {
        Self {
            options,
            graph: Box::new(DotnetCli::new()),
            restorer: Box::new(DotnetCli::new()),
            client,
            sources: Vec::new(),
        }
    }

    /// Replace the graph spec provider and restore runner
    pub fn with_dotnet(
        mut self,
        graph: Box<dyn GraphSpecProvider>,
        restorer: Box<dyn RestoreRunner>,
    ) -> Self {
        self.graph = graph;
        self.restorer = restorer;
        self
    }

    /// Register a package source adapter under its URI
    pub fn with_source(mut self, source: Arc<dyn PackageSource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn options(&self) -> &OutdatedOptions {
        &self.options
    }

    /// Analyse a project file
    ///
    /// Fails only when the dependency graph cannot be produced at all;
    /// per-project failures are collected in the result.
    pub async fn run(&self, project: &Path) -> Result<RunResult, GraphError> {
        let mut progress = Progress::new(self.options.show_progress);

        progress.spinner(&format!("Generating dependency graph for {}", project.display()));
        let spec = self.graph.generate(project)?;

        progress.spinner("Restoring projects");
        let builder = GraphBuilder::new(self.restorer.as_ref(), self.options.build_options());
        let outcome = builder.build_projects(&spec)?;
        info!(
            "Built {} project(s), {} failed",
            outcome.projects.len(),
            outcome.failures.len()
        );

        // the listing cache lives for this run only
        let mut repository = SourceRepository::new(self.client.clone());
        for source in &self.sources {
            repository = repository.with_source(Arc::clone(source));
        }
        let resolver =
            UpstreamResolver::new(repository, self.options.selector(), self.options.concurrency);
        let aggregator = ReportAggregator::new(&resolver, self.options.report_options());

        let requests = aggregator.collect_requests(&outcome.projects);
        progress.start(requests.len() as u64, "Resolving latest versions");
        let lookups = aggregator.resolve_all(requests, &progress).await;
        progress.finish_and_clear();

        let reports = aggregator.build_reports(&outcome.projects, &lookups);
        let summary = ReportSummary::from_reports(&reports);

        Ok(RunResult {
            reports,
            summary,
            failures: outcome.failures,
        })
    }
}
