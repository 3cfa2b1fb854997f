//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ManifestError: Issues with project file parsing and editing
//! - ResolveError: Issues resolving packages against the local cache
//! - InspectError: Issues reading the compiled output
//! - ConfigError: Issues with CLI configuration
//! - IoError: File system operation failures

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Project file related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Package resolution related errors
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Assembly inspection related errors
    #[error(transparent)]
    Inspect(#[from] InspectError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// IO related errors
    #[error(transparent)]
    Io(#[from] IoError),
}

/// Errors related to project file operations
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Failed to read project file
    #[error("failed to read project file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write project file
    #[error("failed to write project file {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed XML
    #[error("failed to parse XML in {path}: {message}")]
    XmlParseError { path: PathBuf, message: String },

    /// Not an SDK-style project
    #[error("{path} is not an SDK-style project (expected <Project Sdk=\"Microsoft.NET.Sdk\">)")]
    NotSdkProject { path: PathBuf },

    /// No TargetFramework property
    #[error("no <TargetFramework> found in {path}")]
    MissingTargetFramework { path: PathBuf },

    /// PackageReference without a version
    #[error("package reference '{package}' in {path} has no version")]
    MissingVersion { path: PathBuf, package: String },

    /// Invalid version in a PackageReference
    #[error("invalid version '{version}' for package '{package}' in {path}")]
    InvalidVersion {
        path: PathBuf,
        package: String,
        version: String,
    },
}

/// Errors raised while resolving the dependency closure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// A version string could not be parsed
    #[error("invalid version '{value}': {message}")]
    InvalidVersion { value: String, message: String },

    /// Package was never restored into the local cache
    #[error("package '{package}' was not found in {cache}. Please restore packages first")]
    PackageNotFound { package: String, cache: String },

    /// No cached version satisfies the request
    #[error(
        "no cached version of '{package}' satisfies >= {requested} (available: {available}). Please restore packages first"
    )]
    VersionNotAvailable {
        package: String,
        requested: String,
        available: String,
    },

    /// Package metadata forms a cycle
    #[error("cyclic dependency detected: {}", .chain.join(" -> "))]
    CyclicDependency { chain: Vec<String> },

    /// Package metadata could not be read
    #[error("failed to read metadata for '{package}' {version}: {message}")]
    Metadata {
        package: String,
        version: String,
        message: String,
    },
}

/// Errors related to reading the compiled output
#[derive(Error, Debug)]
pub enum InspectError {
    /// The build artifact does not exist
    #[error("was not able to find '{path}'. Please build the project first")]
    ArtifactNotFound { path: PathBuf },

    /// Failed to read the artifact
    #[error("failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The artifact is not a valid .NET assembly
    #[error("{path} is not a valid .NET assembly: {message}")]
    Malformed { path: PathBuf, message: String },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Package cache location could not be determined
    #[error("cannot locate the package cache: set NUGET_PACKAGES or pass --packages-dir")]
    PackageCacheUnknown,

    /// Invalid path
    #[error("invalid path '{path}': {message}")]
    InvalidPath { path: PathBuf, message: String },

    /// Conflicting options
    #[error("conflicting options: {message}")]
    ConflictingOptions { message: String },
}

/// Errors related to IO operations
#[derive(Error, Debug)]
pub enum IoError {
    /// Input path does not exist
    #[error("file or directory '{path}' does not exist")]
    PathNotFound { path: PathBuf },

    /// Generic IO error
    #[error("IO error at {path}: {source}")]
    Generic {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ManifestError {
    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new WriteError
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::WriteError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new XmlParseError
    pub fn xml_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::XmlParseError {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl ResolveError {
    /// Creates a new InvalidVersion error
    pub fn invalid_version(value: impl Into<String>, message: impl Into<String>) -> Self {
        ResolveError::InvalidVersion {
            value: value.into(),
            message: message.into(),
        }
    }

    /// Creates a new PackageNotFound error
    pub fn package_not_found(package: impl Into<String>, cache: impl Into<String>) -> Self {
        ResolveError::PackageNotFound {
            package: package.into(),
            cache: cache.into(),
        }
    }

    /// Creates a new Metadata error
    pub fn metadata(
        package: impl Into<String>,
        version: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ResolveError::Metadata {
            package: package.into(),
            version: version.into(),
            message: message.into(),
        }
    }
}

impl InspectError {
    /// Creates a new Malformed error
    pub fn malformed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        InspectError::Malformed {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl IoError {
    /// Creates a new PathNotFound error
    pub fn path_not_found(path: impl Into<PathBuf>) -> Self {
        IoError::PathNotFound { path: path.into() }
    }

    /// Creates a new Generic IO error
    pub fn generic(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IoError::Generic {
            path: path.into(),
            source,
        }
    }
}
