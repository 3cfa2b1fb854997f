//! Redundancy decisions over a resolved closure

use crate::domain::{ClosureEntry, DeclaredDependency, Removal};
use std::collections::{BTreeSet, HashMap};

/// Outcome of a redundancy analysis
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedundancyAnalysis {
    /// Redundant dependencies to remove, sorted by name
    pub removals: Vec<Removal>,
    /// Redundant dependencies kept because the compiled output references them
    pub vetoed: Vec<String>,
}

/// Decide which declared dependencies are redundant.
///
/// A declared dependency is redundant when another declared dependency's
/// closure reaches it. Names referenced by the compiled output are kept.
/// Package ids are compared to assembly names without case.
pub fn analyze(
    declared: &[DeclaredDependency],
    closure: &[ClosureEntry],
    binary_references: &[String],
) -> RedundancyAnalysis {
    let mut reached: HashMap<String, BTreeSet<&str>> = HashMap::new();
    for entry in closure {
        reached
            .entry(entry.package.to_ascii_lowercase())
            .or_default()
            .insert(entry.root.as_str());
    }

    let referenced: BTreeSet<String> = binary_references
        .iter()
        .map(|r| r.to_ascii_lowercase())
        .collect();

    let mut analysis = RedundancyAnalysis::default();
    let mut seen = BTreeSet::new();

    for dependency in declared {
        let key = dependency.name.to_ascii_lowercase();
        if !seen.insert(key.clone()) {
            continue;
        }
        let Some(roots) = reached.get(&key) else {
            continue;
        };
        let reached_by: Vec<String> = roots
            .iter()
            .filter(|root| !root.eq_ignore_ascii_case(&dependency.name))
            .map(|root| root.to_string())
            .collect();
        if reached_by.is_empty() {
            continue;
        }

        if referenced.contains(&key) {
            analysis.vetoed.push(dependency.name.clone());
        } else {
            analysis.removals.push(Removal {
                name: dependency.name.clone(),
                reached_by,
            });
        }
    }

    analysis.removals.sort_by(|a, b| a.name.cmp(&b.name));
    analysis.vetoed.sort();
    analysis
}

/// Names of the declared dependencies to remove, sorted
pub fn compute_removals(
    declared: &[DeclaredDependency],
    closure: &[ClosureEntry],
    binary_references: &[String],
) -> Vec<String> {
    analyze(declared, closure, binary_references)
        .removals
        .into_iter()
        .map(|r| r.name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SemanticVersion;

    fn declared(names: &[&str]) -> Vec<DeclaredDependency> {
        names
            .iter()
            .map(|n| DeclaredDependency::new(*n, SemanticVersion::new(1, 0, 0)))
            .collect()
    }

    fn refs(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_reached_dependency_removed() {
        let closure = vec![ClosureEntry::new("B", 0, "A")];
        let removals = compute_removals(&declared(&["A", "B"]), &closure, &[]);
        assert_eq!(removals, vec!["B"]);
    }

    #[test]
    fn test_referenced_dependency_kept() {
        let closure = vec![ClosureEntry::new("B", 0, "A")];
        let analysis = analyze(&declared(&["A", "B"]), &closure, &refs(&["b"]));
        assert!(analysis.removals.is_empty());
        assert_eq!(analysis.vetoed, vec!["B"]);
    }

    #[test]
    fn test_unreached_dependency_kept() {
        let closure = vec![ClosureEntry::new("X", 0, "A")];
        let removals = compute_removals(&declared(&["A", "B"]), &closure, &[]);
        assert!(removals.is_empty());
    }

    #[test]
    fn test_own_closure_is_not_evidence() {
        let closure = vec![ClosureEntry::new("A", 1, "A")];
        let removals = compute_removals(&declared(&["A", "B"]), &closure, &[]);
        assert!(removals.is_empty());
    }

    #[test]
    fn test_removals_sorted_with_roots() {
        let closure = vec![
            ClosureEntry::new("Zeta", 0, "Root"),
            ClosureEntry::new("alpha", 2, "Other"),
            ClosureEntry::new("Alpha", 0, "Root"),
        ];
        let analysis = analyze(&declared(&["Root", "Zeta", "Alpha", "Other"]), &closure, &[]);
        let names: Vec<&str> = analysis.removals.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);
        assert_eq!(analysis.removals[0].reached_by, vec!["Other", "Root"]);
    }

    #[test]
    fn test_mutual_reachability_removes_both() {
        let closure = vec![ClosureEntry::new("B", 0, "A"), ClosureEntry::new("A", 0, "B")];
        let removals = compute_removals(&declared(&["A", "B"]), &closure, &[]);
        assert_eq!(removals, vec!["A", "B"]);
    }

    #[test]
    fn test_idempotent() {
        let closure = vec![ClosureEntry::new("B", 0, "A"), ClosureEntry::new("C", 1, "A")];
        let deps = declared(&["A", "B", "C"]);
        let first = compute_removals(&deps, &closure, &refs(&["C"]));
        let second = compute_removals(&deps, &closure, &refs(&["C"]));
        assert_eq!(first, second);
        assert_eq!(first, vec!["B"]);
    }
}
