//! In-memory package metadata repository

use super::PackageMetadataRepository;
use crate::domain::{DependencySetDescriptor, SemanticVersion};
use crate::error::ResolveError;
use std::collections::BTreeMap;

/// Repository holding package metadata in memory, keyed case-insensitively
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    packages: BTreeMap<String, BTreeMap<SemanticVersion, Vec<DependencySetDescriptor>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a package version with its dependency sets
    pub fn insert(
        &mut self,
        package: &str,
        version: SemanticVersion,
        sets: Vec<DependencySetDescriptor>,
    ) -> &mut Self {
        self.packages
            .entry(package.to_ascii_lowercase())
            .or_default()
            .insert(version, sets);
        self
    }
}

impl PackageMetadataRepository for InMemoryRepository {
    fn available_versions(&self, package: &str) -> Result<Vec<SemanticVersion>, ResolveError> {
        self.packages
            .get(&package.to_ascii_lowercase())
            .map(|versions| versions.keys().cloned().collect())
            .ok_or_else(|| ResolveError::package_not_found(package, "in-memory repository"))
    }

    fn dependency_sets(
        &self,
        package: &str,
        version: &SemanticVersion,
    ) -> Result<Vec<DependencySetDescriptor>, ResolveError> {
        let versions = self
            .packages
            .get(&package.to_ascii_lowercase())
            .ok_or_else(|| ResolveError::package_not_found(package, "in-memory repository"))?;
        versions
            .get(version)
            .cloned()
            .ok_or_else(|| {
                ResolveError::metadata(package, version.to_string(), "version not registered")
            })
    }
}
