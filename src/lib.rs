//! deptrim - transitive PackageReference pruning library
//!
//! This library provides the core functionality for removing package
//! references from SDK-style .NET project files when they are already
//! brought in by another declared reference:
//! - Project file discovery, parsing and rewriting
//! - Package metadata from the local NuGet cache
//! - Dependency closure resolution per target framework
//! - Assembly reference inspection of the build output

pub mod cli;
pub mod domain;
pub mod error;
pub mod inspect;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod package;
pub mod progress;
pub mod resolve;
