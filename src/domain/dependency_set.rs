//! Framework-scoped dependency sets published by a package version

use super::{FrameworkFamily, VersionRange};
use serde::Serialize;

/// A dependency edge declared by a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageDependency {
    /// Id of the depended-on package
    pub id: String,
    /// Accepted versions
    pub range: VersionRange,
}

impl PackageDependency {
    pub fn new(id: impl Into<String>, range: VersionRange) -> Self {
        Self {
            id: id.into(),
            range,
        }
    }
}

/// One `<group>` of a package's dependency metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencySetDescriptor {
    /// Framework the group is scoped to; `None` for an unscoped group
    pub target_framework: Option<String>,
    /// Dependencies of the group, in declaration order
    pub dependencies: Vec<PackageDependency>,
}

impl DependencySetDescriptor {
    /// Creates an unscoped set
    pub fn unscoped(dependencies: Vec<PackageDependency>) -> Self {
        Self {
            target_framework: None,
            dependencies,
        }
    }

    /// Creates a set scoped to a framework
    pub fn scoped(framework: impl Into<String>, dependencies: Vec<PackageDependency>) -> Self {
        Self {
            target_framework: Some(framework.into()),
            dependencies,
        }
    }

    /// Family the set is scoped to, `None` when unscoped
    pub fn family(&self) -> Option<FrameworkFamily> {
        self.target_framework
            .as_deref()
            .filter(|tfm| !tfm.trim().is_empty())
            .map(FrameworkFamily::of)
    }
}
