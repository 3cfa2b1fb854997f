//! Project file detection, parsing and editing
//!
//! This module provides functionality to:
//! - Detect `.csproj` files in a directory tree
//! - Parse target framework, output kind and package references
//! - Remove package references while preserving formatting

mod csproj;
mod detector;
mod writer;

pub use csproj::{parse_project, remove_package_reference, OutputKind, ProjectManifest};
pub use detector::{detect_projects, is_project_file};
pub use writer::{read_manifest, write_manifest, ManifestWriter, WriteResult};

use crate::error::ManifestError;
use std::path::Path;

/// Read and parse a project file
pub fn load_project(path: &Path) -> Result<ProjectManifest, ManifestError> {
    let content = read_manifest(path)?;
    parse_project(path, &content)
}
