//! Dependency graph spec model
//!
//! Deserializes the JSON written by the `GenerateRestoreGraphFile` MSBuild
//! target. Only the parts needed to locate lock files and read direct
//! package references are modelled; object order is kept so that
//! frameworks and dependencies stay in declaration order.

use crate::error::GraphError;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Top-level dependency graph spec
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DependencyGraphSpec {
    /// Per-project specs keyed by project path
    #[serde(default)]
    pub projects: IndexMap<String, ProjectSpec>,
}

/// One project of the graph
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectSpec {
    pub restore: RestoreMetadata,
    /// Per-framework dependency declarations keyed by framework alias
    #[serde(default)]
    pub frameworks: IndexMap<String, FrameworkSpec>,
}

/// How a project references packages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum ProjectStyle {
    PackageReference,
    PackagesConfig,
    ProjectJson,
    DotnetCliTool,
    Standalone,
    DotnetToolReference,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Restore metadata of a project
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreMetadata {
    #[serde(default)]
    pub project_name: Option<String>,
    pub project_path: PathBuf,
    /// Directory where restore writes the assets file
    #[serde(default)]
    pub output_path: Option<PathBuf>,
    #[serde(default)]
    pub project_style: ProjectStyle,
    /// Configured package sources keyed by URI
    #[serde(default)]
    pub sources: IndexMap<String, serde_json::Value>,
}

/// Declarations for one target framework
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrameworkSpec {
    #[serde(default)]
    pub dependencies: IndexMap<String, DependencySpec>,
}

/// A declared dependency
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencySpec {
    /// `Package` or `Project`
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub auto_referenced: bool,
}

impl DependencyGraphSpec {
    /// Parses a dependency graph spec from JSON text
    pub fn from_json(content: &str, origin: &Path) -> Result<Self, GraphError> {
        serde_json::from_str(content).map_err(|e| GraphError::unavailable(origin, e.to_string()))
    }

    /// Reads a dependency graph spec file
    pub fn from_file(path: &Path) -> Result<Self, GraphError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| GraphError::unavailable(path, e.to_string()))?;
        Self::from_json(&content, path)
    }

    /// Projects that use package references, in graph order
    pub fn package_reference_projects(&self) -> impl Iterator<Item = &ProjectSpec> {
        self.projects
            .values()
            .filter(|p| p.restore.project_style == ProjectStyle::PackageReference)
    }
}

impl ProjectSpec {
    /// Project name, falling back to the file stem
    pub fn name(&self) -> String {
        self.restore.project_name.clone().unwrap_or_else(|| {
            self.restore
                .project_path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        })
    }

    /// Source URIs in configuration order
    pub fn sources(&self) -> Vec<String> {
        self.restore.sources.keys().cloned().collect()
    }

    /// Location of the assets file written by restore
    pub fn assets_path(&self) -> PathBuf {
        let output = match self.restore.output_path {
            Some(ref path) => path.clone(),
            None => self
                .restore
                .project_path
                .parent()
                .map(|p| p.join("obj"))
                .unwrap_or_else(|| PathBuf::from("obj")),
        };
        output.join("project.assets.json")
    }
}

impl DependencySpec {
    /// Returns true if this declaration references a package rather than a project
    pub fn is_package(&self) -> bool {
        self.target
            .as_deref()
            .is_none_or(|t| t.eq_ignore_ascii_case("package"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "format": 1,
        "restore": { "/src/App/App.csproj": {} },
        "projects": {
            "/src/App/App.csproj": {
                "version": "1.0.0",
                "restore": {
                    "projectUniqueName": "/src/App/App.csproj",
                    "projectName": "App",
                    "projectPath": "/src/App/App.csproj",
                    "outputPath": "/src/App/obj/",
                    "projectStyle": "PackageReference",
                    "sources": {
                        "https://api.nuget.org/v3/index.json": {},
                        "/home/me/feed": {}
                    }
                },
                "frameworks": {
                    "net8.0": {
                        "targetAlias": "net8.0",
                        "dependencies": {
                            "Serilog": { "target": "Package", "version": "[3.1.1, )" },
                            "Microsoft.NETCore.App.Ref": { "target": "Package", "version": "[8.0.0]", "autoReferenced": true },
                            "Autofac": { "target": "Package", "version": "[7.0.0, )" }
                        }
                    }
                }
            },
            "/src/Legacy/Legacy.csproj": {
                "restore": {
                    "projectPath": "/src/Legacy/Legacy.csproj",
                    "projectStyle": "PackagesConfig"
                }
            },
            "/src/Odd/Odd.csproj": {
                "restore": {
                    "projectPath": "/src/Odd/Odd.csproj",
                    "projectStyle": "SomethingNew"
                }
            }
        }
    }"#;

    fn sample() -> DependencyGraphSpec {
        DependencyGraphSpec::from_json(SAMPLE, Path::new("graph.json")).unwrap()
    }

    #[test]
    fn test_parse_projects() {
        let spec = sample();
        assert_eq!(spec.projects.len(), 3);
    }

    #[test]
    fn test_project_style_filter() {
        let spec = sample();
        let names: Vec<_> = spec.package_reference_projects().map(|p| p.name()).collect();
        assert_eq!(names, vec!["App"]);
    }

    #[test]
    fn test_unknown_style_is_tolerated() {
        let spec = sample();
        let odd = &spec.projects["/src/Odd/Odd.csproj"];
        assert_eq!(odd.restore.project_style, ProjectStyle::Unknown);
    }

    #[test]
    fn test_dependencies_keep_declaration_order() {
        let spec = sample();
        let app = &spec.projects["/src/App/App.csproj"];
        let names: Vec<_> = app.frameworks["net8.0"].dependencies.keys().cloned().collect();
        assert_eq!(names, vec!["Serilog", "Microsoft.NETCore.App.Ref", "Autofac"]);
        assert!(app.frameworks["net8.0"].dependencies["Microsoft.NETCore.App.Ref"].auto_referenced);
    }

    #[test]
    fn test_sources_and_assets_path() {
        let spec = sample();
        let app = &spec.projects["/src/App/App.csproj"];
        assert_eq!(
            app.sources(),
            vec!["https://api.nuget.org/v3/index.json", "/home/me/feed"]
        );
        assert_eq!(
            app.assets_path(),
            PathBuf::from("/src/App/obj/project.assets.json")
        );
    }

    #[test]
    fn test_name_falls_back_to_file_stem() {
        let spec = sample();
        assert_eq!(spec.projects["/src/Legacy/Legacy.csproj"].name(), "Legacy");
    }

    #[test]
    fn test_is_package() {
        let package = DependencySpec {
            target: Some("Package".into()),
            ..Default::default()
        };
        let project = DependencySpec {
            target: Some("Project".into()),
            ..Default::default()
        };
        assert!(package.is_package());
        assert!(!project.is_package());
        assert!(DependencySpec::default().is_package());
    }

    #[test]
    fn test_invalid_json_is_unavailable() {
        let err = DependencyGraphSpec::from_json("{ not json", Path::new("graph.json")).unwrap_err();
        assert!(matches!(err, GraphError::Unavailable { .. }));
    }
}
