//! Prune result summary types
//!
//! Provides structures for tracking removal decisions at file and overall levels.

use super::DeclaredDependency;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Why a redundant dependency stays in the project file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeepReason {
    /// The compiled output references an assembly of the same name
    ReferencedByAssembly,
    /// Protected with --keep
    Protected,
}

impl fmt::Display for KeepReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeepReason::ReferencedByAssembly => write!(f, "referenced by assembly"),
            KeepReason::Protected => write!(f, "protected by --keep"),
        }
    }
}

/// A declared dependency that is removed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Removal {
    /// Package id as declared
    pub name: String,
    /// Declared dependencies whose closure already contains the package
    pub reached_by: Vec<String>,
}

/// A redundant dependency that is kept anyway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeptDependency {
    /// Package id as declared
    pub name: String,
    /// Why it is kept
    pub reason: KeepReason,
}

/// Prune result for a single project file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestReport {
    /// Path to the project file
    pub path: PathBuf,
    /// Target framework moniker of the project
    pub target_framework: String,
    /// Declared dependencies, in manifest order
    pub declared: Vec<DeclaredDependency>,
    /// Dependencies removed (or removable in dry-run)
    pub removals: Vec<Removal>,
    /// Redundant dependencies that were kept
    pub kept: Vec<KeptDependency>,
    /// Whether the file was actually modified
    pub modified: bool,
}

impl ManifestReport {
    /// Creates a new ManifestReport
    pub fn new(path: impl Into<PathBuf>, target_framework: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            target_framework: target_framework.into(),
            declared: Vec::new(),
            removals: Vec::new(),
            kept: Vec::new(),
            modified: false,
        }
    }

    /// Records the declared dependencies
    pub fn with_declared(mut self, declared: Vec<DeclaredDependency>) -> Self {
        self.declared = declared;
        self
    }

    pub fn add_removal(&mut self, removal: Removal) {
        self.removals.push(removal);
    }

    pub fn add_kept(&mut self, name: impl Into<String>, reason: KeepReason) {
        self.kept.push(KeptDependency {
            name: name.into(),
            reason,
        });
    }

    /// Returns the number of removals
    pub fn removal_count(&self) -> usize {
        self.removals.len()
    }

    /// Returns the number of kept redundant dependencies
    pub fn kept_count(&self) -> usize {
        self.kept.len()
    }

    /// Returns true if any dependency is removed
    pub fn has_removals(&self) -> bool {
        !self.removals.is_empty()
    }

    /// Names of the removed dependencies
    pub fn removal_names(&self) -> Vec<&str> {
        self.removals.iter().map(|r| r.name.as_str()).collect()
    }
}

/// Overall summary of all prune operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PruneSummary {
    /// Results for each project file processed
    pub manifests: Vec<ManifestReport>,
    /// Whether this was a dry run
    pub dry_run: bool,
}

impl PruneSummary {
    /// Creates a new PruneSummary
    pub fn new(dry_run: bool) -> Self {
        Self {
            manifests: Vec::new(),
            dry_run,
        }
    }

    /// Adds a manifest report
    pub fn add_manifest(&mut self, manifest: ManifestReport) {
        self.manifests.push(manifest);
    }

    /// Returns the total number of files processed
    pub fn files_processed(&self) -> usize {
        self.manifests.len()
    }

    /// Returns the total number of files modified
    pub fn files_modified(&self) -> usize {
        self.manifests.iter().filter(|m| m.modified).count()
    }

    /// Returns the total number of removed dependencies
    pub fn total_removals(&self) -> usize {
        self.manifests.iter().map(|m| m.removal_count()).sum()
    }

    /// Returns the total number of kept redundant dependencies
    pub fn total_kept(&self) -> usize {
        self.manifests.iter().map(|m| m.kept_count()).sum()
    }

    /// Returns true if any files were modified
    pub fn has_changes(&self) -> bool {
        self.files_modified() > 0
    }

    /// Returns all removals across all manifests
    pub fn all_removals(&self) -> impl Iterator<Item = &Removal> {
        self.manifests.iter().flat_map(|m| m.removals.iter())
    }
}

impl Default for PruneSummary {
    fn default() -> Self {
        Self::new(false)
    }
}
