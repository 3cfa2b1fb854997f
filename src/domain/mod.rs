//! Core domain models for deptrim
//!
//! This module contains the fundamental types used throughout the application:
//! - Package versions and version ranges
//! - Target framework families
//! - Declared dependencies and package dependency sets
//! - Closure entries produced by resolution
//! - Summary and result structures

mod closure;
mod dependency;
mod dependency_set;
mod framework;
mod summary;
mod version;
mod version_range;

pub use closure::ClosureEntry;
pub use dependency::DeclaredDependency;
pub use dependency_set::{DependencySetDescriptor, PackageDependency};
pub use framework::{FrameworkFamily, TargetFramework};
pub use summary::{KeepReason, KeptDependency, ManifestReport, PruneSummary, Removal};
pub use version::{select_version, SemanticVersion};
pub use version_range::VersionRange;
