//! Text output formatter for human-readable display
//!
//! Each project is printed as a tree per target framework, children indented
//! under their parent. Nodes without a known latest version carry a banner
//! saying why.

use crate::domain::{
    DependencyReport, DependencyStatus, LatestLookup, ProjectReport, ReportSummary,
    TargetFrameworkReport, UpgradeSeverity,
};
use crate::orchestrator::RunResult;
use crate::output::OutputFormatter;
use colored::{ColoredString, Colorize};
use std::io::Write;

/// Indentation of one tree level
const INDENT: usize = 2;

const CANNOT_RESOLVE: &str = "Cannot resolve referenced version";
const NO_MATCHING_VERSION: &str = "No upstream version matches the range, lock and prerelease policies";
const SOURCES_UNREACHABLE: &str = "Could not reach or read any package source";

/// Text formatter for human-readable output
pub struct TextFormatter {
    color: bool,
}

impl TextFormatter {
    pub fn new() -> Self {
        Self { color: true }
    }

    pub fn with_color(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, text: &str, style: impl Fn(ColoredString) -> ColoredString) -> String {
        if self.color {
            style(text.normal()).to_string()
        } else {
            text.to_string()
        }
    }

    fn severity_label(&self, severity: UpgradeSeverity) -> String {
        match severity {
            UpgradeSeverity::Major => self.paint(severity.label(), |s| s.red().bold()),
            UpgradeSeverity::Minor => self.paint(severity.label(), |s| s.yellow()),
            UpgradeSeverity::Patch => self.paint(severity.label(), |s| s.green()),
        }
    }

    fn format_project(&self, project: &ProjectReport, writer: &mut dyn Write) -> std::io::Result<()> {
        let marker = if project.is_up_to_date() {
            format!("  {}", self.paint("✓", |s| s.green()))
        } else {
            String::new()
        };
        writeln!(
            writer,
            "{} {}{}",
            self.paint(&project.name, |s| s.bold()),
            self.paint(&format!("({})", project.path.display()), |s| s.dimmed()),
            marker
        )?;

        for target_framework in &project.target_frameworks {
            self.format_target_framework(target_framework, writer)?;
        }
        writeln!(writer)
    }

    fn format_target_framework(
        &self,
        target_framework: &TargetFrameworkReport,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        writeln!(
            writer,
            "{}[{}]",
            " ".repeat(INDENT),
            self.paint(&target_framework.name, |s| s.cyan())
        )?;

        if target_framework.dependencies.is_empty() {
            writeln!(
                writer,
                "{}{}",
                " ".repeat(INDENT * 2),
                self.paint("Nothing to report", |s| s.dimmed())
            )?;
            return Ok(());
        }

        let width = target_framework
            .nodes()
            .map(|n| n.depth * INDENT + n.name.len())
            .max()
            .unwrap_or(0);
        for dependency in &target_framework.dependencies {
            self.format_node(dependency, width, writer)?;
        }
        Ok(())
    }

    fn format_node(
        &self,
        node: &DependencyReport,
        width: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let indent = " ".repeat(INDENT * 2 + node.depth * INDENT);
        let name = format!("{:width$}", node.name, width = width - node.depth * INDENT);
        let name = if node.auto_referenced {
            self.paint(&name, |s| s.italic())
        } else {
            name
        };

        writeln!(writer, "{}{}  {}", indent, name, self.describe(node))?;

        for child in &node.dependencies {
            self.format_node(child, width, writer)?;
        }
        Ok(())
    }

    /// Everything after the name column
    fn describe(&self, node: &DependencyReport) -> String {
        let resolved = match node.resolved_version {
            Some(ref v) => v.to_string(),
            None => {
                let range = node
                    .version_range
                    .as_ref()
                    .map(|r| format!("{} ", r))
                    .unwrap_or_default();
                return format!("{}{}", range, self.paint(CANNOT_RESOLVE, |s| s.red().bold()));
            }
        };

        match (&node.status, &node.latest) {
            (DependencyStatus::Outdated, LatestLookup::Found { version, published }) => {
                let date = published
                    .map(|d| self.paint(&format!(" ({})", d.format("%Y-%m-%d")), |s| s.dimmed()))
                    .unwrap_or_default();
                let severity = node
                    .severity
                    .map(|s| format!(" [{}]", self.severity_label(s)))
                    .unwrap_or_default();
                format!(
                    "{} {} {}{}{}",
                    self.paint(&resolved, |s| s.dimmed()),
                    self.paint("→", |s| s.dimmed()),
                    self.paint(&version.to_string(), |s| s.bright_white().bold()),
                    severity,
                    date
                )
            }
            (_, LatestLookup::NoMatchingVersion) => {
                format!("{}  {}", resolved, self.paint(NO_MATCHING_VERSION, |s| s.yellow()))
            }
            (_, LatestLookup::SourcesUnreachable { errors }) => {
                let detail = errors
                    .first()
                    .map(|e| format!(": {}", e))
                    .unwrap_or_default();
                format!(
                    "{}  {}",
                    resolved,
                    self.paint(&format!("{}{}", SOURCES_UNREACHABLE, detail), |s| s.yellow())
                )
            }
            _ => format!("{}  {}", resolved, self.paint("up to date", |s| s.green())),
        }
    }

    fn format_summary(&self, summary: &ReportSummary, writer: &mut dyn Write) -> std::io::Result<()> {
        if summary.outdated == 0 && summary.unresolvable == 0 {
            writeln!(
                writer,
                "{} All {} reported dependencies are up to date",
                self.paint("✓", |s| s.green()),
                summary.dependencies
            )?;
            return Ok(());
        }

        let mut parts = Vec::new();
        if summary.outdated > 0 {
            parts.push(self.paint(&format!("{} outdated", summary.outdated), |s| s.yellow()));
        }
        if summary.unresolvable > 0 {
            parts.push(self.paint(&format!("{} unresolvable", summary.unresolvable), |s| s.red()));
        }
        writeln!(
            writer,
            "Summary: {} of {} dependencies in {} project(s)",
            parts.join(", "),
            summary.dependencies,
            summary.projects
        )
    }
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, result: &RunResult, writer: &mut dyn Write) -> std::io::Result<()> {
        for project in &result.reports {
            self.format_project(project, writer)?;
        }

        if !result.failures.is_empty() {
            writeln!(writer, "{}", self.paint("Failed projects:", |s| s.red().bold()))?;
            for failure in &result.failures {
                writeln!(writer, "  {} {}", self.paint("✗", |s| s.red()), failure)?;
            }
            writeln!(writer)?;
        }

        self.format_summary(&result.summary, writer)
    }
}
