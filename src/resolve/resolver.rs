//! Transitive closure expansion over package metadata

use super::select_dependency_set;
use crate::domain::{ClosureEntry, DeclaredDependency, SemanticVersion, TargetFramework};
use crate::error::ResolveError;
use crate::package::PackageMetadataRepository;
use tracing::debug;

/// A package waiting to be expanded
struct Frame {
    package: String,
    requested: SemanticVersion,
    depth: usize,
}

/// A package on the current expansion branch
struct Ancestor {
    key: String,
    package: String,
    version: SemanticVersion,
}

impl Ancestor {
    fn label(&self) -> String {
        format!("{} {}", self.package, self.version)
    }
}

/// Expands declared dependencies into their transitive closure
pub struct DependencyResolver<'a> {
    repository: &'a dyn PackageMetadataRepository,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(repository: &'a dyn PackageMetadataRepository) -> Self {
        Self { repository }
    }

    /// Resolve the closure of every declared dependency.
    ///
    /// Entries of each root come in depth-first order. Any resolution failure
    /// aborts the whole closure.
    pub fn resolve_closure(
        &self,
        declared: &[DeclaredDependency],
        consumer: &TargetFramework,
    ) -> Result<Vec<ClosureEntry>, ResolveError> {
        let mut closure = Vec::new();
        for root in declared {
            self.expand(root, consumer, &mut closure)?;
        }
        Ok(closure)
    }

    fn expand(
        &self,
        root: &DeclaredDependency,
        consumer: &TargetFramework,
        closure: &mut Vec<ClosureEntry>,
    ) -> Result<(), ResolveError> {
        let mut stack = vec![Frame {
            package: root.name.clone(),
            requested: root.version.clone(),
            depth: 0,
        }];
        let mut branch: Vec<Ancestor> = Vec::new();

        while let Some(frame) = stack.pop() {
            // ancestors of a frame at depth d occupy branch[..d]
            branch.truncate(frame.depth);

            let version = self
                .repository
                .resolve_version(&frame.package, &frame.requested)?;
            let key = frame.package.to_ascii_lowercase();

            if branch.iter().any(|a| a.key == key && a.version == version) {
                let mut chain: Vec<String> = branch.iter().map(Ancestor::label).collect();
                chain.push(format!("{} {}", frame.package, version));
                return Err(ResolveError::CyclicDependency { chain });
            }

            let sets = self.repository.dependency_sets(&frame.package, &version)?;
            branch.push(Ancestor {
                key,
                package: frame.package.clone(),
                version: version.clone(),
            });

            let Some(selected) = select_dependency_set(&sets, consumer) else {
                debug!(
                    package = %frame.package,
                    %version,
                    consumer = %consumer,
                    "no dependency set for consumer framework"
                );
                continue;
            };

            debug!(
                package = %frame.package,
                %version,
                depth = frame.depth,
                dependencies = selected.dependencies.len(),
                "expanding"
            );

            for dependency in &selected.dependencies {
                closure.push(ClosureEntry::new(&dependency.id, frame.depth, &root.name));
            }
            // reversed so children pop in declaration order
            for dependency in selected.dependencies.iter().rev() {
                stack.push(Frame {
                    package: dependency.id.clone(),
                    requested: dependency.range.min_version(),
                    depth: frame.depth + 1,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DependencySetDescriptor, PackageDependency, VersionRange};
    use crate::package::InMemoryRepository;

    fn v(s: &str) -> SemanticVersion {
        SemanticVersion::parse(s).unwrap()
    }

    fn deps(items: &[(&str, &str)]) -> Vec<DependencySetDescriptor> {
        vec![DependencySetDescriptor::unscoped(
            items
                .iter()
                .map(|(id, range)| PackageDependency::new(*id, VersionRange::parse(range).unwrap()))
                .collect(),
        )]
    }

    fn declared(name: &str, version: &str) -> DeclaredDependency {
        DeclaredDependency::new(name, v(version))
    }

    fn net8() -> TargetFramework {
        TargetFramework::new("net8.0")
    }

    #[test]
    fn test_closure_depth_and_root() {
        let mut repo = InMemoryRepository::new();
        repo.insert("A", v("1.0.0"), deps(&[("B", "1.0.0"), ("C", "1.0.0")]))
            .insert("B", v("1.0.0"), deps(&[("D", "2.0.0")]))
            .insert("C", v("1.0.0"), Vec::new())
            .insert("D", v("2.0.0"), Vec::new());

        let resolver = DependencyResolver::new(&repo);
        let closure = resolver
            .resolve_closure(&[declared("A", "1.0.0")], &net8())
            .unwrap();

        assert_eq!(
            closure,
            vec![
                ClosureEntry::new("B", 0, "A"),
                ClosureEntry::new("C", 0, "A"),
                ClosureEntry::new("D", 1, "A"),
            ]
        );
    }

    #[test]
    fn test_closure_uses_range_minimum() {
        let mut repo = InMemoryRepository::new();
        repo.insert("A", v("1.0.0"), deps(&[("B", "[1.5.0, 2.0.0)")]))
            .insert("B", v("1.4.0"), deps(&[("Old", "1.0.0")]))
            .insert("B", v("1.6.0"), deps(&[("New", "1.0.0")]))
            .insert("New", v("1.0.0"), Vec::new());

        let resolver = DependencyResolver::new(&repo);
        let closure = resolver
            .resolve_closure(&[declared("A", "1.0.0")], &net8())
            .unwrap();
        let names: Vec<&str> = closure.iter().map(|e| e.package.as_str()).collect();
        assert_eq!(names, vec!["B", "New"]);
    }

    #[test]
    fn test_closure_respects_framework_selection() {
        let mut repo = InMemoryRepository::new();
        repo.insert(
            "A",
            v("1.0.0"),
            vec![
                DependencySetDescriptor::scoped(
                    ".NETFramework4.6.1",
                    vec![PackageDependency::new("LegacyOnly", VersionRange::any())],
                ),
                DependencySetDescriptor::scoped(
                    ".NETStandard2.0",
                    vec![PackageDependency::new("Shared", VersionRange::any())],
                ),
            ],
        )
        .insert("Shared", v("1.0.0"), Vec::new());

        let resolver = DependencyResolver::new(&repo);
        let closure = resolver
            .resolve_closure(&[declared("A", "1.0.0")], &net8())
            .unwrap();
        assert_eq!(closure, vec![ClosureEntry::new("Shared", 0, "A")]);
    }

    #[test]
    fn test_unmatched_framework_ends_branch() {
        let mut repo = InMemoryRepository::new();
        repo.insert(
            "A",
            v("1.0.0"),
            vec![
                DependencySetDescriptor::scoped("net6.0", Vec::new()),
                DependencySetDescriptor::scoped(".NETFramework4.8", Vec::new()),
            ],
        );
        let resolver = DependencyResolver::new(&repo);
        let closure = resolver
            .resolve_closure(&[declared("A", "1.0.0")], &net8())
            .unwrap();
        assert!(closure.is_empty());
    }

    #[test]
    fn test_cycle_detected() {
        let mut repo = InMemoryRepository::new();
        repo.insert("A", v("1.0.0"), deps(&[("B", "1.0.0")]))
            .insert("B", v("1.0.0"), deps(&[("A", "1.0.0")]));

        let resolver = DependencyResolver::new(&repo);
        let err = resolver
            .resolve_closure(&[declared("A", "1.0.0")], &net8())
            .unwrap_err();
        assert_eq!(
            err,
            ResolveError::CyclicDependency {
                chain: vec![
                    "A 1.0.0".to_string(),
                    "B 1.0.0".to_string(),
                    "A 1.0.0".to_string()
                ]
            }
        );
        assert!(err.to_string().contains("A 1.0.0 -> B 1.0.0 -> A 1.0.0"));
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let mut repo = InMemoryRepository::new();
        repo.insert("A", v("1.0.0"), deps(&[("B", "1.0.0"), ("C", "1.0.0")]))
            .insert("B", v("1.0.0"), deps(&[("D", "1.0.0")]))
            .insert("C", v("1.0.0"), deps(&[("D", "1.0.0")]))
            .insert("D", v("1.0.0"), Vec::new());

        let resolver = DependencyResolver::new(&repo);
        let closure = resolver
            .resolve_closure(&[declared("A", "1.0.0")], &net8())
            .unwrap();
        assert_eq!(closure.iter().filter(|e| e.package == "D").count(), 2);
    }

    #[test]
    fn test_missing_transitive_package_fails() {
        let mut repo = InMemoryRepository::new();
        repo.insert("A", v("1.0.0"), deps(&[("Ghost", "1.0.0")]));

        let resolver = DependencyResolver::new(&repo);
        let err = resolver
            .resolve_closure(&[declared("A", "1.0.0")], &net8())
            .unwrap_err();
        assert!(matches!(err, ResolveError::PackageNotFound { .. }));
    }

    #[test]
    fn test_declared_version_not_available() {
        let mut repo = InMemoryRepository::new();
        repo.insert("A", v("1.0.0"), Vec::new());

        let resolver = DependencyResolver::new(&repo);
        let err = resolver
            .resolve_closure(&[declared("A", "2.0.0")], &net8())
            .unwrap_err();
        assert!(matches!(err, ResolveError::VersionNotAvailable { .. }));
    }
}
