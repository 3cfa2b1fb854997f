//! Prune orchestrator for coordinating the whole workflow
//!
//! This module provides:
//! - Workflow coordination: detect → parse → inspect → resolve → decide → write
//! - Concurrent project analysis bounded by `--jobs`
//! - Dry-run mode support
//! - `--keep` protection
//! - Error handling with partial continuation

use crate::cli::CliArgs;
use crate::domain::{KeepReason, ManifestReport, PruneSummary};
use crate::error::ConfigError;
use crate::inspect::{locate_artifact, AssemblyInspector, PeMetadataInspector};
use crate::manifest::{detect_projects, load_project, ManifestWriter};
use crate::package::{LocalPackageCache, PackageMetadataRepository};
use crate::progress::Progress;
use crate::resolve::{analyze, DependencyResolver};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info};

/// Orchestrator for coordinating the prune workflow
pub struct Orchestrator {
    /// CLI arguments for configuration
    args: CliArgs,
    /// Package metadata source
    repository: Arc<dyn PackageMetadataRepository>,
    /// Reader for build artifacts
    inspector: Arc<dyn AssemblyInspector>,
    /// Bounds the number of projects analyzed at once
    semaphore: Arc<Semaphore>,
}

/// Result of running the orchestrator
pub struct OrchestratorResult {
    /// Prune summary for every project that was analyzed
    pub summary: PruneSummary,
    /// Errors encountered during processing
    pub errors: Vec<OrchestratorError>,
}

impl OrchestratorResult {
    /// Returns true if any project failed
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Errors that can occur during orchestration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrchestratorError {
    /// Failed to discover project files
    DetectionError(String),
    /// Failed to read or parse a project file
    ManifestError { path: String, message: String },
    /// Failed to locate or read the build output
    InspectError { path: String, message: String },
    /// Failed to resolve the dependency closure
    ResolveError { path: String, message: String },
    /// Failed to write a project file
    WriteError { path: String, message: String },
    /// A worker task did not complete
    TaskError { path: String, message: String },
}

impl OrchestratorError {
    /// Project file the error belongs to, if any
    pub fn path(&self) -> Option<&str> {
        match self {
            OrchestratorError::DetectionError(_) => None,
            OrchestratorError::ManifestError { path, .. }
            | OrchestratorError::InspectError { path, .. }
            | OrchestratorError::ResolveError { path, .. }
            | OrchestratorError::WriteError { path, .. }
            | OrchestratorError::TaskError { path, .. } => Some(path),
        }
    }
}

impl std::fmt::Display for OrchestratorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrchestratorError::DetectionError(msg) => {
                write!(f, "Project detection error: {}", msg)
            }
            OrchestratorError::ManifestError { path, message } => {
                write!(f, "Failed to parse {}: {}", path, message)
            }
            OrchestratorError::InspectError { path, message } => {
                write!(f, "Failed to inspect build output of {}: {}", path, message)
            }
            OrchestratorError::ResolveError { path, message } => {
                write!(f, "Failed to resolve dependencies of {}: {}", path, message)
            }
            OrchestratorError::WriteError { path, message } => {
                write!(f, "Failed to write {}: {}", path, message)
            }
            OrchestratorError::TaskError { path, message } => {
                write!(f, "Processing of {} did not complete: {}", path, message)
            }
        }
    }
}

impl std::error::Error for OrchestratorError {}

/// Per-project pipeline shared by worker tasks
struct Pipeline {
    repository: Arc<dyn PackageMetadataRepository>,
    inspector: Arc<dyn AssemblyInspector>,
    args: CliArgs,
}

impl Pipeline {
    /// Analyze one project and apply its removals
    ///
    /// The project file is only written once every earlier step succeeded.
    fn process(&self, path: &Path) -> Result<ManifestReport, OrchestratorError> {
        let manifest = path.display().to_string();
        info!(path = %manifest, "analyzing project");

        let project = load_project(path).map_err(|e| OrchestratorError::ManifestError {
            path: manifest.clone(),
            message: e.to_string(),
        })?;
        let tfm = project.target_framework.clone();

        let inspect_error = |message: String| OrchestratorError::InspectError {
            path: manifest.clone(),
            message,
        };
        let artifact = locate_artifact(
            project.project_dir(),
            &self.args.configuration,
            tfm.moniker(),
            &project.artifact_file_name(),
        )
        .map_err(|e| inspect_error(e.to_string()))?;
        let references = self
            .inspector
            .referenced_assemblies(&artifact)
            .map_err(|e| inspect_error(e.to_string()))?;
        debug!(artifact = %artifact.display(), references = references.len(), "inspected build output");

        let resolver = DependencyResolver::new(self.repository.as_ref());
        let closure = resolver
            .resolve_closure(&project.dependencies, &tfm)
            .map_err(|e| OrchestratorError::ResolveError {
                path: manifest.clone(),
                message: e.to_string(),
            })?;
        debug!(path = %manifest, entries = closure.len(), "resolved closure");

        let analysis = analyze(&project.dependencies, &closure, &references);

        let mut report = ManifestReport::new(path, tfm.moniker())
            .with_declared(project.dependencies.clone());
        for name in analysis.vetoed {
            report.add_kept(name, KeepReason::ReferencedByAssembly);
        }
        for removal in analysis.removals {
            if self.args.is_protected(&removal.name) {
                report.add_kept(removal.name, KeepReason::Protected);
            } else {
                report.add_removal(removal);
            }
        }

        let names: Vec<String> = report.removals.iter().map(|r| r.name.clone()).collect();
        let written = ManifestWriter::new(self.args.dry_run)
            .apply_removals(path, &names)
            .map_err(|e| OrchestratorError::WriteError {
                path: manifest.clone(),
                message: e.to_string(),
            })?;
        report
            .removals
            .retain(|r| written.removed.iter().any(|n| n == &r.name));
        report.modified = written.file_modified;

        info!(
            path = %manifest,
            removed = report.removal_count(),
            kept = report.kept_count(),
            "project analyzed"
        );
        Ok(report)
    }
}

impl Orchestrator {
    /// Create a new orchestrator reading the local package cache
    pub fn new(args: CliArgs) -> Result<Self, ConfigError> {
        args.validate()?;
        let root = args.package_cache_root()?;
        debug!(cache = %root.display(), "using package cache");
        Ok(Self::with_components(
            args,
            Arc::new(LocalPackageCache::new(root)),
            Arc::new(PeMetadataInspector::new()),
        ))
    }

    /// Create an orchestrator with custom collaborators
    pub fn with_components(
        args: CliArgs,
        repository: Arc<dyn PackageMetadataRepository>,
        inspector: Arc<dyn AssemblyInspector>,
    ) -> Self {
        let jobs = args.jobs.max(1);
        Self {
            args,
            repository,
            inspector,
            semaphore: Arc::new(Semaphore::new(jobs)),
        }
    }

    /// Run the prune workflow
    pub async fn run(&self) -> OrchestratorResult {
        self.run_with_progress(!self.args.quiet && !self.args.json)
            .await
    }

    /// Run the prune workflow with optional progress display
    pub async fn run_with_progress(&self, show_progress: bool) -> OrchestratorResult {
        let mut progress = Progress::new(show_progress);
        let mut summary = PruneSummary::new(self.args.dry_run);
        let mut errors = Vec::new();

        // Step 1: Detect project files
        progress.detecting(&self.args.path);
        let projects = match detect_projects(&self.args.path) {
            Ok(projects) => projects,
            Err(e) => {
                progress.finish();
                errors.push(OrchestratorError::DetectionError(e.to_string()));
                return OrchestratorResult { summary, errors };
            }
        };

        if projects.is_empty() {
            progress.finish();
            return OrchestratorResult { summary, errors };
        }

        // Step 2: Analyze projects concurrently
        let pipeline = Arc::new(Pipeline {
            repository: Arc::clone(&self.repository),
            inspector: Arc::clone(&self.inspector),
            args: self.args.clone(),
        });

        progress.analyzing(projects.len());
        let handles: Vec<(PathBuf, _)> = projects
            .into_iter()
            .map(|path| {
                let pipeline = Arc::clone(&pipeline);
                let semaphore = Arc::clone(&self.semaphore);
                let task_path = path.clone();
                let handle = tokio::spawn(async move {
                    let _permit = semaphore.acquire_owned().await;
                    tokio::task::spawn_blocking(move || pipeline.process(&task_path)).await
                });
                (path, handle)
            })
            .collect();

        // Step 3: Collect in discovery order
        for (path, handle) in handles {
            match handle.await {
                Ok(Ok(Ok(report))) => summary.add_manifest(report),
                Ok(Ok(Err(error))) => errors.push(error),
                Ok(Err(join)) | Err(join) => errors.push(OrchestratorError::TaskError {
                    path: path.display().to_string(),
                    message: join.to_string(),
                }),
            }
            progress.project_done(&path);
        }
        progress.finish();

        OrchestratorResult { summary, errors }
    }
}
