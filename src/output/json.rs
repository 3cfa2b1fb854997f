//! JSON output formatter for machine processing
//!
//! This module provides:
//! - JSON serialization of prune results
//! - Structured per-project removal and keep information

use crate::domain::{ManifestReport, PruneSummary};
use crate::orchestrator::OrchestratorResult;
use crate::output::{OutputFormatter, Verbosity};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level affects detail in output
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

/// JSON representation of the full result
#[derive(Serialize)]
struct JsonOutput {
    /// Whether this was a dry-run
    dry_run: bool,
    /// Summary statistics
    summary: JsonSummary,
    /// Per-project results
    manifests: Vec<JsonManifest>,
    /// Errors encountered
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<JsonError>,
}

/// JSON representation of summary statistics
#[derive(Serialize)]
struct JsonSummary {
    projects: usize,
    modified: usize,
    removed: usize,
    kept: usize,
}

/// JSON representation of a project report
#[derive(Serialize)]
struct JsonManifest {
    path: String,
    target_framework: String,
    modified: bool,
    removed: Vec<JsonRemoval>,
    kept: Vec<JsonKept>,
    /// Declared references (verbose only)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    declared: Vec<String>,
}

#[derive(Serialize)]
struct JsonRemoval {
    name: String,
    /// Declared references whose closure already contains this package
    reached_by: Vec<String>,
}

#[derive(Serialize)]
struct JsonKept {
    name: String,
    reason: String,
}

#[derive(Serialize)]
struct JsonError {
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    message: String,
}

impl JsonFormatter {
    fn summary_to_json(summary: &PruneSummary) -> JsonSummary {
        JsonSummary {
            projects: summary.files_processed(),
            modified: summary.files_modified(),
            removed: summary.total_removals(),
            kept: summary.total_kept(),
        }
    }

    /// Convert a project report to JSON representation
    fn manifest_to_json(&self, manifest: &ManifestReport) -> JsonManifest {
        let declared = if self.verbosity == Verbosity::Verbose {
            manifest.declared.iter().map(|d| d.to_string()).collect()
        } else {
            Vec::new()
        };

        JsonManifest {
            path: manifest.path.display().to_string(),
            target_framework: manifest.target_framework.clone(),
            modified: manifest.modified,
            removed: manifest
                .removals
                .iter()
                .map(|r| JsonRemoval {
                    name: r.name.clone(),
                    reached_by: r.reached_by.clone(),
                })
                .collect(),
            kept: manifest
                .kept
                .iter()
                .map(|k| JsonKept {
                    name: k.name.clone(),
                    reason: k.reason.to_string(),
                })
                .collect(),
            declared,
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let output = JsonOutput {
            dry_run: result.summary.dry_run,
            summary: Self::summary_to_json(&result.summary),
            manifests: result
                .summary
                .manifests
                .iter()
                .map(|m| self.manifest_to_json(m))
                .collect(),
            errors: result
                .errors
                .iter()
                .map(|e| JsonError {
                    path: e.path().map(str::to_string),
                    message: e.to_string(),
                })
                .collect(),
        };

        let json = serde_json::to_string_pretty(&output).map_err(std::io::Error::other)?;

        writeln!(writer, "{}", json)?;

        Ok(())
    }

    fn format_summary(
        &self,
        summary: &PruneSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(&Self::summary_to_json(summary))
            .map_err(std::io::Error::other)?;

        writeln!(writer, "{}", json)?;

        Ok(())
    }

    fn format_manifest(
        &self,
        manifest: &ManifestReport,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let output = self.manifest_to_json(manifest);

        let json = serde_json::to_string_pretty(&output).map_err(std::io::Error::other)?;

        writeln!(writer, "{}", json)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DeclaredDependency, KeepReason, Removal, SemanticVersion};
    use crate::orchestrator::OrchestratorError;

    fn create_test_result() -> OrchestratorResult {
        let mut summary = PruneSummary::new(true);
        let mut report = ManifestReport::new("/src/App/App.csproj", "net8.0").with_declared(vec![
            DeclaredDependency::new("Azure.Storage.Blobs", SemanticVersion::new(12, 19, 1)),
            DeclaredDependency::new("Azure.Core", SemanticVersion::new(1, 36, 0)),
        ]);
        report.add_removal(Removal {
            name: "Azure.Core".to_string(),
            reached_by: vec!["Azure.Storage.Blobs".to_string()],
        });
        report.add_kept("Newtonsoft.Json", KeepReason::ReferencedByAssembly);
        summary.add_manifest(report);

        OrchestratorResult {
            summary,
            errors: vec![OrchestratorError::InspectError {
                path: "/src/Web/Web.csproj".to_string(),
                message: "Please build the project first".to_string(),
            }],
        }
    }

    fn render(verbosity: Verbosity) -> serde_json::Value {
        let mut output = Vec::new();
        JsonFormatter::new(verbosity)
            .format(&create_test_result(), &mut output)
            .unwrap();
        serde_json::from_str(&String::from_utf8(output).unwrap()).unwrap()
    }

    #[test]
    fn test_format_json() {
        let parsed = render(Verbosity::Normal);

        assert_eq!(parsed["dry_run"], true);
        assert_eq!(parsed["summary"]["projects"], 1);
        assert_eq!(parsed["summary"]["removed"], 1);
        assert_eq!(parsed["summary"]["kept"], 1);
        assert_eq!(parsed["manifests"][0]["path"], "/src/App/App.csproj");
        assert_eq!(parsed["manifests"][0]["target_framework"], "net8.0");
        assert_eq!(parsed["manifests"][0]["removed"][0]["name"], "Azure.Core");
        assert_eq!(
            parsed["manifests"][0]["removed"][0]["reached_by"][0],
            "Azure.Storage.Blobs"
        );
        assert_eq!(
            parsed["manifests"][0]["kept"][0]["reason"],
            "referenced by assembly"
        );
        assert_eq!(parsed["errors"][0]["path"], "/src/Web/Web.csproj");
        assert!(parsed["manifests"][0]["declared"].is_null());
    }

    #[test]
    fn test_format_json_verbose() {
        let parsed = render(Verbosity::Verbose);
        assert_eq!(
            parsed["manifests"][0]["declared"][0],
            "Azure.Storage.Blobs@12.19.1"
        );
    }

    #[test]
    fn test_format_summary() {
        let formatter = JsonFormatter::new(Verbosity::Normal);
        let mut output = Vec::new();

        formatter
            .format_summary(&PruneSummary::new(false), &mut output)
            .unwrap();
        let parsed: serde_json::Value =
            serde_json::from_str(&String::from_utf8(output).unwrap()).unwrap();
        assert_eq!(parsed["removed"], 0);
        assert_eq!(parsed["projects"], 0);
    }
}
