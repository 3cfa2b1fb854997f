//! Compiled output inspection
//!
//! This module provides:
//! - The inspector trait listing the assemblies a build output references
//! - A metadata based implementation backed by `dotscope`
//! - Build artifact location under `bin/<configuration>/<tfm>/`

mod pe;

pub use pe::{read_assembly_refs, PeMetadataInspector};

use crate::error::InspectError;
use std::path::{Path, PathBuf};

/// Prebuilt assemblies under `tests/fixtures/assemblies`
#[cfg(test)]
pub(crate) fn fixture_assembly(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("assemblies")
        .join(name)
}

/// Lists the assembly names a compiled artifact references
pub trait AssemblyInspector: Send + Sync {
    fn referenced_assemblies(&self, path: &Path) -> Result<Vec<String>, InspectError>;
}

/// Default build configuration
pub const DEFAULT_CONFIGURATION: &str = "Debug";

/// Candidate artifact paths for a project, in probe order
pub fn artifact_candidates(
    project_dir: &Path,
    configuration: &str,
    target_framework: &str,
    file_name: &str,
) -> Vec<PathBuf> {
    let mut configurations = vec![configuration.to_string()];
    let lower = configuration.to_ascii_lowercase();
    if lower != configuration {
        configurations.push(lower);
    }
    configurations
        .into_iter()
        .map(|c| {
            project_dir
                .join("bin")
                .join(c)
                .join(target_framework)
                .join(file_name)
        })
        .collect()
}

/// Locate the built artifact of a project
pub fn locate_artifact(
    project_dir: &Path,
    configuration: &str,
    target_framework: &str,
    file_name: &str,
) -> Result<PathBuf, InspectError> {
    let candidates = artifact_candidates(project_dir, configuration, target_framework, file_name);
    if let Some(found) = candidates.iter().find(|p| p.is_file()) {
        return Ok(found.clone());
    }
    let path = candidates
        .into_iter()
        .next()
        .unwrap_or_else(|| project_dir.join(file_name));
    Err(InspectError::ArtifactNotFound { path })
}
