//! CLI argument parsing module for deptrim

use crate::error::ConfigError;
use crate::inspect::DEFAULT_CONFIGURATION;
use crate::package::LocalPackageCache;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Default number of projects analyzed concurrently
pub const DEFAULT_JOBS: usize = 4;

/// Parse a positive job count
fn parse_jobs(s: &str) -> Result<usize, String> {
    let jobs: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid number of jobs: {}", s))?;
    if jobs == 0 {
        return Err("number of jobs must be at least 1".to_string());
    }
    Ok(jobs)
}

/// Remove package references already brought in transitively
#[derive(Parser, Debug, Clone)]
#[command(
    name = "deptrim",
    version,
    about = "Remove redundant transitive PackageReferences from SDK-style .NET projects"
)]
pub struct CliArgs {
    /// Project file or directory searched recursively for .csproj files
    #[arg(default_value = ".")]
    pub path: PathBuf,

    // General options
    /// Dry run mode - show what would be removed without making changes
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,

    // Resolution options
    /// NuGet global packages folder (default: ~/.nuget/packages)
    #[arg(long, env = "NUGET_PACKAGES", value_name = "DIR")]
    pub packages_dir: Option<PathBuf>,

    /// Build configuration whose output is inspected
    #[arg(short = 'c', long, default_value = DEFAULT_CONFIGURATION, value_name = "NAME")]
    pub configuration: String,

    /// Never remove this package (can be specified multiple times)
    #[arg(long, value_name = "NAME", action = ArgAction::Append)]
    pub keep: Vec<String>,

    /// Number of projects analyzed concurrently
    #[arg(short = 'j', long, default_value_t = DEFAULT_JOBS, value_parser = parse_jobs)]
    pub jobs: usize,
}

impl CliArgs {
    /// Reject option combinations that cannot be honoured
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quiet && self.verbose {
            return Err(ConfigError::ConflictingOptions {
                message: "--quiet and --verbose cannot be used together".to_string(),
            });
        }
        if let Some(dir) = &self.packages_dir {
            if dir.exists() && !dir.is_dir() {
                return Err(ConfigError::InvalidPath {
                    path: dir.clone(),
                    message: "package cache must be a directory".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Check if a package is protected with --keep
    pub fn is_protected(&self, name: &str) -> bool {
        self.keep.iter().any(|k| k.eq_ignore_ascii_case(name))
    }

    /// Root of the package cache to resolve against
    pub fn package_cache_root(&self) -> Result<PathBuf, ConfigError> {
        self.packages_dir
            .clone()
            .or_else(LocalPackageCache::default_root)
            .ok_or(ConfigError::PackageCacheUnknown)
    }
}
