//! Package version parsing and ordering
//!
//! NuGet versions are `major.minor[.patch[.revision]][-prerelease][+metadata]`.
//! The three-part core and prerelease tag are held in a [`semver::Version`];
//! the optional fourth component is kept alongside it. Build metadata is
//! accepted but never takes part in comparisons.

use crate::error::ResolveError;
use semver::{BuildMetadata, Prerelease};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// A parsed, totally ordered package version
#[derive(Debug, Clone)]
pub struct SemanticVersion {
    core: semver::Version,
    revision: u64,
}

impl SemanticVersion {
    /// Creates a release version from its numeric parts
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            core: semver::Version::new(major, minor, patch),
            revision: 0,
        }
    }

    /// The lowest possible version, used when a range has no lower bound
    pub fn zero() -> Self {
        Self::new(0, 0, 0)
    }

    /// Parse a version string
    pub fn parse(text: &str) -> Result<Self, ResolveError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ResolveError::invalid_version(text, "empty version"));
        }

        // Build metadata never participates in ordering
        let without_metadata = trimmed.split('+').next().unwrap_or(trimmed);
        let (numbers, pre) = match without_metadata.split_once('-') {
            Some((numbers, pre)) => (numbers, Some(pre)),
            None => (without_metadata, None),
        };

        let parts = numbers
            .split('.')
            .map(|part| {
                part.parse::<u64>().map_err(|_| {
                    ResolveError::invalid_version(text, format!("'{}' is not a number", part))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if parts.len() > 4 {
            return Err(ResolveError::invalid_version(
                text,
                "expected at most four numeric components",
            ));
        }

        let part = |i: usize| parts.get(i).copied().unwrap_or(0);
        let pre = match pre {
            Some(tag) => Prerelease::new(tag)
                .map_err(|e| ResolveError::invalid_version(text, e.to_string()))?,
            None => Prerelease::EMPTY,
        };

        Ok(Self {
            core: semver::Version {
                major: part(0),
                minor: part(1),
                patch: part(2),
                pre,
                build: BuildMetadata::EMPTY,
            },
            revision: part(3),
        })
    }

    pub fn major(&self) -> u64 {
        self.core.major
    }

    pub fn minor(&self) -> u64 {
        self.core.minor
    }

    pub fn patch(&self) -> u64 {
        self.core.patch
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns true if this version carries a prerelease tag
    pub fn is_prerelease(&self) -> bool {
        !self.core.pre.is_empty()
    }
}

/// Pick the version to resolve from a set of cached versions.
///
/// An exact match wins; otherwise the smallest version greater than the
/// requested one is chosen. The result does not depend on the order of
/// `available`.
pub fn select_version<'a>(
    available: &'a [SemanticVersion],
    requested: &SemanticVersion,
) -> Option<&'a SemanticVersion> {
    available
        .iter()
        .find(|v| *v == requested)
        .or_else(|| available.iter().filter(|v| *v >= requested).min())
}

impl PartialEq for SemanticVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SemanticVersion {}

impl Ord for SemanticVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.core.major, self.core.minor, self.core.patch, self.revision)
            .cmp(&(
                other.core.major,
                other.core.minor,
                other.core.patch,
                other.revision,
            ))
            .then_with(|| self.core.pre.cmp(&other.core.pre))
    }
}

impl PartialOrd for SemanticVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Hash for SemanticVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.core.major.hash(state);
        self.core.minor.hash(state);
        self.core.patch.hash(state);
        self.revision.hash(state);
        self.core.pre.hash(state);
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}",
            self.core.major, self.core.minor, self.core.patch
        )?;
        if self.revision > 0 {
            write!(f, ".{}", self.revision)?;
        }
        if !self.core.pre.is_empty() {
            write!(f, "-{}", self.core.pre)?;
        }
        Ok(())
    }
}

impl FromStr for SemanticVersion {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for SemanticVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SemanticVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}
