//! Project file writing
//!
//! This module provides:
//! - ManifestWriter for removing package references from project files
//! - Dry-run mode support (no actual file modifications)
//! - Format preservation when removing references

use crate::error::ManifestError;
use crate::manifest::remove_package_reference;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Writer for project files that applies removals
pub struct ManifestWriter {
    /// Whether to run in dry-run mode (no file modifications)
    dry_run: bool,
}

/// Result of applying removals to a project file
#[derive(Debug)]
pub struct WriteResult {
    /// Path to the project file
    pub path: PathBuf,
    /// Package references that were removed from the text
    pub removed: Vec<String>,
    /// Requested removals with no matching element
    pub not_found: Vec<String>,
    /// Whether the file was actually modified
    pub file_modified: bool,
}

impl WriteResult {
    fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            removed: Vec::new(),
            not_found: Vec::new(),
            file_modified: false,
        }
    }

    /// Returns true if any reference was removed
    pub fn has_removals(&self) -> bool {
        !self.removed.is_empty()
    }
}

impl ManifestWriter {
    /// Create a new ManifestWriter
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Create a ManifestWriter in dry-run mode
    pub fn dry_run() -> Self {
        Self { dry_run: true }
    }

    /// Check if this writer is in dry-run mode
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Remove the named package references from a project file
    pub fn apply_removals(
        &self,
        path: &Path,
        packages: &[String],
    ) -> Result<WriteResult, ManifestError> {
        let mut result = WriteResult::new(path);
        if packages.is_empty() {
            return Ok(result);
        }

        let mut content = read_manifest(path)?;
        for package in packages {
            match remove_package_reference(&content, package) {
                Some(updated) => {
                    content = updated;
                    result.removed.push(package.clone());
                }
                None => {
                    warn!(path = %path.display(), package, "package reference not found in text");
                    result.not_found.push(package.clone());
                }
            }
        }

        if result.has_removals() && !self.dry_run {
            write_manifest(path, &content)?;
            result.file_modified = true;
        }

        Ok(result)
    }
}

/// Read a project file content safely
pub fn read_manifest(path: &Path) -> Result<String, ManifestError> {
    fs::read_to_string(path).map_err(|e| ManifestError::read_error(path, e))
}

/// Write content to a project file
pub fn write_manifest(path: &Path, content: &str) -> Result<(), ManifestError> {
    fs::write(path, content).map_err(|e| ManifestError::write_error(path, e))
}
