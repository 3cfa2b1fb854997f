//! Dependency resolution and redundancy decisions
//!
//! This module provides:
//! - Framework dependency set selection
//! - Transitive closure expansion against a package repository
//! - The decision engine that picks redundant declared dependencies

mod decision;
mod resolver;
mod selector;

pub use decision::{analyze, compute_removals, RedundancyAnalysis};
pub use resolver::DependencyResolver;
pub use selector::select_dependency_set;
