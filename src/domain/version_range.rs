//! NuGet version range notation
//!
//! Handles:
//! - Minimum inclusive: `1.0`
//! - Exact: `[1.0]`
//! - Interval: `[1.0,2.0)`, `(1.0,)`, `(,2.0]`

use super::SemanticVersion;
use crate::error::ResolveError;
use serde::{Serialize, Serializer};
use std::fmt;

/// A version range as declared in package metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    /// Raw range text as it appears in the metadata
    raw: String,
    /// Lower bound, if any
    min: Option<SemanticVersion>,
    min_inclusive: bool,
    /// Upper bound, if any
    max: Option<SemanticVersion>,
    max_inclusive: bool,
}

impl VersionRange {
    /// A range accepting every version
    pub fn any() -> Self {
        Self {
            raw: String::new(),
            min: None,
            min_inclusive: true,
            max: None,
            max_inclusive: false,
        }
    }

    /// A plain minimum-inclusive range (`1.0` in NuGet notation)
    pub fn at_least(version: SemanticVersion) -> Self {
        Self {
            raw: version.to_string(),
            min: Some(version),
            min_inclusive: true,
            max: None,
            max_inclusive: false,
        }
    }

    /// Parse range text
    pub fn parse(text: &str) -> Result<Self, ResolveError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(Self::any());
        }

        let opens = trimmed.starts_with('[') || trimmed.starts_with('(');
        if !opens {
            let mut range = Self::at_least(SemanticVersion::parse(trimmed)?);
            range.raw = trimmed.to_string();
            return Ok(range);
        }

        let closes = trimmed.ends_with(']') || trimmed.ends_with(')');
        if !closes || trimmed.len() < 2 {
            return Err(ResolveError::invalid_version(text, "unterminated range"));
        }

        let min_inclusive = trimmed.starts_with('[');
        let max_inclusive = trimmed.ends_with(']');
        let inner = &trimmed[1..trimmed.len() - 1];

        let bound = |s: &str| -> Result<Option<SemanticVersion>, ResolveError> {
            let s = s.trim();
            if s.is_empty() {
                Ok(None)
            } else {
                SemanticVersion::parse(s).map(Some)
            }
        };

        let (min, max) = match inner.split_once(',') {
            Some((lo, hi)) => (bound(lo)?, bound(hi)?),
            None => {
                // `[1.0]` pins a single version
                if !(min_inclusive && max_inclusive) {
                    return Err(ResolveError::invalid_version(
                        text,
                        "single-version range must use []",
                    ));
                }
                let exact = bound(inner)?
                    .ok_or_else(|| ResolveError::invalid_version(text, "empty range"))?;
                (Some(exact.clone()), Some(exact))
            }
        };

        Ok(Self {
            raw: trimmed.to_string(),
            min,
            min_inclusive,
            max,
            max_inclusive,
        })
    }

    /// The version the resolver expands: the lower bound, or zero when unbounded
    pub fn min_version(&self) -> SemanticVersion {
        self.min.clone().unwrap_or_else(SemanticVersion::zero)
    }

    /// Returns true if `version` lies inside the range
    pub fn contains(&self, version: &SemanticVersion) -> bool {
        let above_min = match &self.min {
            Some(min) if self.min_inclusive => version >= min,
            Some(min) => version > min,
            None => true,
        };
        let below_max = match &self.max {
            Some(max) if self.max_inclusive => version <= max,
            Some(max) => version < max,
            None => true,
        };
        above_min && below_max
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.raw.is_empty() {
            write!(f, "*")
        } else {
            write!(f, "{}", self.raw)
        }
    }
}

impl Serialize for VersionRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
