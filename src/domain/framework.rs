//! Target framework families
//!
//! Package authors publish one dependency group per family of consuming
//! frameworks. Only the family matters for selecting a group, so monikers are
//! reduced to one of three families.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Cross-platform marker in a framework moniker (`netcoreapp3.1`, `.NETCoreApp`)
const CROSS_PLATFORM_MARKER: &str = "core";

/// Standard-layer marker in a framework moniker (`netstandard2.0`, `.NETStandard`)
const STANDARD_MARKER: &str = "standard";

/// Family of consuming frameworks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameworkFamily {
    /// .NET Core and .NET 5+ (`netcoreapp*`, `net6.0`)
    Modern,
    /// .NET Standard (`netstandard*`)
    Abstraction,
    /// .NET Framework (`net461`, `.NETFramework4.8`)
    Legacy,
}

impl FrameworkFamily {
    /// Classify a framework moniker or identifier
    pub fn of(tag: &str) -> Self {
        let tag = tag.trim().to_ascii_lowercase();
        let tag = tag.trim_start_matches('.');

        if tag.contains(STANDARD_MARKER) {
            FrameworkFamily::Abstraction
        } else if tag.contains(CROSS_PLATFORM_MARKER) || is_net5_plus(tag) {
            FrameworkFamily::Modern
        } else {
            FrameworkFamily::Legacy
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FrameworkFamily::Modern => ".NET (Core)",
            FrameworkFamily::Abstraction => ".NET Standard",
            FrameworkFamily::Legacy => ".NET Framework",
        }
    }
}

/// `net5.0` and later dropped the `core` marker but use a dotted version
fn is_net5_plus(tag: &str) -> bool {
    let Some(rest) = tag.strip_prefix("net") else {
        return false;
    };
    let Some((major, _)) = rest.split_once('.') else {
        return false;
    };
    major.parse::<u32>().map(|m| m >= 5).unwrap_or(false)
}

impl fmt::Display for FrameworkFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// The target framework of a consuming project
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetFramework {
    moniker: String,
}

impl TargetFramework {
    pub fn new(moniker: impl Into<String>) -> Self {
        Self {
            moniker: moniker.into(),
        }
    }

    /// The moniker as written in the project file (e.g. `netcoreapp2.0`)
    pub fn moniker(&self) -> &str {
        &self.moniker
    }

    pub fn family(&self) -> FrameworkFamily {
        FrameworkFamily::of(&self.moniker)
    }
}

impl fmt::Display for TargetFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.moniker)
    }
}
