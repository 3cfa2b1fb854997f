//! Transitive closure entries

use serde::Serialize;

/// A package reached while expanding a declared dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClosureEntry {
    /// Id of the reached package
    pub package: String,
    /// 0 for dependencies of the declared package itself
    pub depth: usize,
    /// Declared dependency whose expansion produced this entry
    pub root: String,
}

impl ClosureEntry {
    pub fn new(package: impl Into<String>, depth: usize, root: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            depth,
            root: root.into(),
        }
    }
}
