//! Declared dependency structures

use super::SemanticVersion;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A package explicitly declared in a project file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeclaredDependency {
    /// Package id
    pub name: String,
    /// Requested version
    pub version: SemanticVersion,
}

impl DeclaredDependency {
    /// Creates a new declared dependency
    pub fn new(name: impl Into<String>, version: SemanticVersion) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }

    /// Package ids are case-insensitive
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

impl fmt::Display for DeclaredDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}
