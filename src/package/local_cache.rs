//! Repository over the NuGet global packages folder
//!
//! Layout: `<root>/<lowercase id>/<version>/`, each version directory holding
//! an extracted `<id>.nuspec` and/or the original `<id>.<version>.nupkg`.

use super::{parse_nuspec, PackageMetadataRepository};
use crate::domain::{DependencySetDescriptor, SemanticVersion};
use crate::error::ResolveError;
use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

type MemoKey = (String, SemanticVersion);
type VersionDirs = Vec<(SemanticVersion, PathBuf)>;

/// Read-only view of a local package cache
///
/// Version listings and parsed dependency sets are memoized per package, so
/// packages reached along several paths of the graph are scanned only once.
#[derive(Debug)]
pub struct LocalPackageCache {
    root: PathBuf,
    versions: Mutex<HashMap<String, VersionDirs>>,
    memo: Mutex<HashMap<MemoKey, Vec<DependencySetDescriptor>>>,
}

impl LocalPackageCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            versions: Mutex::new(HashMap::new()),
            memo: Mutex::new(HashMap::new()),
        }
    }

    /// Default cache location: `NUGET_PACKAGES`, else `~/.nuget/packages`
    pub fn default_root() -> Option<PathBuf> {
        if let Some(dir) = std::env::var_os("NUGET_PACKAGES").filter(|v| !v.is_empty()) {
            return Some(PathBuf::from(dir));
        }
        std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .filter(|v| !v.is_empty())
            .map(|home| PathBuf::from(home).join(".nuget").join("packages"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn package_dir(&self, package: &str) -> Option<PathBuf> {
        let lower = self.root.join(package.to_ascii_lowercase());
        if lower.is_dir() {
            return Some(lower);
        }
        let exact = self.root.join(package);
        exact.is_dir().then_some(exact)
    }

    /// Version directories of a package, ascending
    fn version_dirs(&self, package: &str) -> Result<VersionDirs, ResolveError> {
        let key = package.to_ascii_lowercase();
        {
            let versions = self.versions.lock().unwrap_or_else(|p| p.into_inner());
            if let Some(dirs) = versions.get(&key) {
                return Ok(dirs.clone());
            }
        }

        let dirs = self.scan_versions(package)?;
        let mut versions = self.versions.lock().unwrap_or_else(|p| p.into_inner());
        versions.insert(key, dirs.clone());
        Ok(dirs)
    }

    fn scan_versions(&self, package: &str) -> Result<VersionDirs, ResolveError> {
        let not_found =
            || ResolveError::package_not_found(package, self.root.display().to_string());
        let dir = self.package_dir(package).ok_or_else(not_found)?;
        let entries = fs::read_dir(&dir).map_err(|_| not_found())?;

        let mut versions = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            match SemanticVersion::parse(&name) {
                Ok(version) => versions.push((version, path)),
                Err(_) => debug!(package, dir = %name, "ignoring non-version directory"),
            }
        }
        versions.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(versions)
    }

    fn read_metadata(
        &self,
        package: &str,
        version: &SemanticVersion,
        dir: &Path,
    ) -> Result<String, ResolveError> {
        let label = version.to_string();
        if let Some(nuspec) = find_with_extension(dir, "nuspec") {
            debug!(path = %nuspec.display(), "reading extracted nuspec");
            return fs::read_to_string(&nuspec)
                .map_err(|e| ResolveError::metadata(package, &label, e.to_string()));
        }
        if let Some(nupkg) = find_with_extension(dir, "nupkg") {
            debug!(path = %nupkg.display(), "reading nuspec from package archive");
            return read_nuspec_from_archive(&nupkg)
                .map_err(|message| ResolveError::metadata(package, &label, message));
        }
        Err(ResolveError::metadata(
            package,
            label,
            format!("no .nuspec or .nupkg in {}", dir.display()),
        ))
    }
}

impl PackageMetadataRepository for LocalPackageCache {
    fn available_versions(&self, package: &str) -> Result<Vec<SemanticVersion>, ResolveError> {
        Ok(self
            .version_dirs(package)?
            .into_iter()
            .map(|(version, _)| version)
            .collect())
    }

    fn dependency_sets(
        &self,
        package: &str,
        version: &SemanticVersion,
    ) -> Result<Vec<DependencySetDescriptor>, ResolveError> {
        let key = (package.to_ascii_lowercase(), version.clone());
        {
            let memo = self.memo.lock().unwrap_or_else(|p| p.into_inner());
            if let Some(sets) = memo.get(&key) {
                return Ok(sets.clone());
            }
        }

        let dir = self
            .version_dirs(package)?
            .into_iter()
            .find(|(v, _)| v == version)
            .map(|(_, dir)| dir)
            .ok_or_else(|| {
                ResolveError::metadata(package, version.to_string(), "version not in cache")
            })?;

        let xml = self.read_metadata(package, version, &dir)?;
        let nuspec = parse_nuspec(package, &version.to_string(), &xml)?;
        if let Some(id) = nuspec.id.as_deref() {
            if !id.eq_ignore_ascii_case(package) {
                warn!(package, nuspec_id = id, "nuspec id does not match package directory");
            }
        }

        let mut memo = self.memo.lock().unwrap_or_else(|p| p.into_inner());
        memo.insert(key, nuspec.dependency_sets.clone());
        Ok(nuspec.dependency_sets)
    }
}

fn find_with_extension(dir: &Path, extension: &str) -> Option<PathBuf> {
    let mut matches: Vec<PathBuf> = fs::read_dir(dir)
        .ok()?
        .flatten()
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .map(|e| e.eq_ignore_ascii_case(extension))
                    .unwrap_or(false)
        })
        .collect();
    matches.sort();
    matches.into_iter().next()
}

fn read_nuspec_from_archive(path: &Path) -> Result<String, String> {
    let file = fs::File::open(path).map_err(|e| e.to_string())?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| e.to_string())?;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(|e| e.to_string())?;
        let name = entry.name().to_string();
        // the package's own nuspec sits at the archive root
        if !name.contains('/') && name.to_ascii_lowercase().ends_with(".nuspec") {
            let mut xml = String::new();
            entry.read_to_string(&mut xml).map_err(|e| e.to_string())?;
            return Ok(xml);
        }
    }
    Err(format!("no .nuspec entry in {}", path.display()))
}
