//! Project file discovery
//!
//! Features:
//! - Accepts a single `.csproj` path or a directory
//! - Recursive directory search, skipping build output and VCS folders
//! - Sorted results for deterministic output

use crate::error::IoError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directories never searched for project files
const SKIPPED_DIRS: &[&str] = &["bin", "obj", ".git", "node_modules"];

/// Returns true if the path names a C# project file
pub fn is_project_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("csproj"))
        .unwrap_or(false)
}

/// Find project files at `path`
///
/// A file path is returned as-is; a directory is searched recursively.
pub fn detect_projects(path: &Path) -> Result<Vec<PathBuf>, IoError> {
    if !path.exists() {
        return Err(IoError::path_not_found(path));
    }
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut projects = Vec::new();
    walk(path, &mut projects)?;
    projects.sort();
    debug!(root = %path.display(), count = projects.len(), "discovered projects");
    Ok(projects)
}

fn walk(dir: &Path, projects: &mut Vec<PathBuf>) -> Result<(), IoError> {
    let entries = fs::read_dir(dir).map_err(|e| IoError::generic(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| IoError::generic(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| IoError::generic(&path, e))?;

        if file_type.is_dir() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if SKIPPED_DIRS.iter().any(|s| s.eq_ignore_ascii_case(&name)) {
                continue;
            }
            walk(&path, projects)?;
        } else if file_type.is_file() && is_project_file(&path) {
            projects.push(path);
        }
    }
    Ok(())
}
