//! Package metadata sources
//!
//! This module provides:
//! - The repository trait the resolver reads package metadata through
//! - A repository over the local NuGet global packages folder
//! - `.nuspec` dependency metadata parsing
//! - An in-memory repository

mod local_cache;
mod memory;
mod nuspec;

pub use local_cache::LocalPackageCache;
pub use memory::InMemoryRepository;
pub use nuspec::{parse_nuspec, Nuspec};

use crate::domain::{select_version, DependencySetDescriptor, SemanticVersion};
use crate::error::ResolveError;

/// Read-only source of package dependency metadata
pub trait PackageMetadataRepository: Send + Sync {
    /// All versions of a package available locally, in ascending order
    fn available_versions(&self, package: &str) -> Result<Vec<SemanticVersion>, ResolveError>;

    /// Dependency sets declared by one package version
    fn dependency_sets(
        &self,
        package: &str,
        version: &SemanticVersion,
    ) -> Result<Vec<DependencySetDescriptor>, ResolveError>;

    /// Select the available version to use for a requested one
    fn resolve_version(
        &self,
        package: &str,
        requested: &SemanticVersion,
    ) -> Result<SemanticVersion, ResolveError> {
        let available = self.available_versions(package)?;
        select_version(&available, requested)
            .cloned()
            .ok_or_else(|| ResolveError::VersionNotAvailable {
                package: package.to_string(),
                requested: requested.to_string(),
                available: available
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> SemanticVersion {
        SemanticVersion::parse(s).unwrap()
    }

    fn repository() -> InMemoryRepository {
        let mut repo = InMemoryRepository::new();
        repo.insert("Serilog", v("1.0.0"), Vec::new())
            .insert("Serilog", v("1.2.0"), Vec::new())
            .insert("Serilog", v("2.0.0"), Vec::new());
        repo
    }

    #[test]
    fn test_resolve_version_prefers_exact() {
        let resolved = repository().resolve_version("Serilog", &v("1.2.0")).unwrap();
        assert_eq!(resolved, v("1.2.0"));
    }

    #[test]
    fn test_resolve_version_closest_higher() {
        let resolved = repository().resolve_version("Serilog", &v("1.1.0")).unwrap();
        assert_eq!(resolved, v("1.2.0"));
    }

    #[test]
    fn test_resolve_version_not_available() {
        let err = repository()
            .resolve_version("Serilog", &v("3.0.0"))
            .unwrap_err();
        match err {
            ResolveError::VersionNotAvailable {
                package, available, ..
            } => {
                assert_eq!(package, "Serilog");
                assert_eq!(available, "1.0.0, 1.2.0, 2.0.0");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resolve_version_unknown_package() {
        let err = repository()
            .resolve_version("Missing", &v("1.0.0"))
            .unwrap_err();
        assert!(matches!(err, ResolveError::PackageNotFound { .. }));
    }
}
