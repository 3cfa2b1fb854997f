//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Per-project removal display with the declared roots that reach each package
//! - Kept redundant references with reasons
//! - Summary with an optional per-framework breakdown

use crate::domain::{KeepReason, ManifestReport, PruneSummary};
use crate::orchestrator::OrchestratorResult;
use crate::output::{OutputFormatter, Verbosity};
use colored::Colorize;
use std::collections::BTreeMap;
use std::io::Write;

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether this is a dry-run
    dry_run: bool,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity, dry_run: bool) -> Self {
        Self {
            verbosity,
            dry_run,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, dry_run: bool, color: bool) -> Self {
        Self {
            verbosity,
            dry_run,
            color,
        }
    }

    /// Get the dry-run prefix if applicable
    fn dry_run_prefix(&self) -> String {
        if self.dry_run {
            if self.color {
                format!("{} ", "(dry-run)".cyan())
            } else {
                "(dry-run) ".to_string()
            }
        } else {
            String::new()
        }
    }

    fn removed_verb(&self) -> &'static str {
        if self.dry_run {
            "removable"
        } else {
            "removed"
        }
    }

    fn format_keep_reason(&self, reason: KeepReason) -> String {
        reason.to_string()
    }

    /// Longest package name in the report, for alignment
    fn max_name_length(manifest: &ManifestReport) -> usize {
        manifest
            .removals
            .iter()
            .map(|r| r.name.len())
            .chain(manifest.kept.iter().map(|k| k.name.len()))
            .max()
            .unwrap_or(0)
    }

    fn format_header(
        &self,
        manifest: &ManifestReport,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let prefix = self.dry_run_prefix();
        let path_display = manifest.path.display().to_string();
        let removed = manifest.removal_count();
        let kept = manifest.kept_count();

        if self.color {
            write!(writer, "{}", prefix)?;
            write!(writer, "{}", path_display.bold())?;
            write!(
                writer,
                " {}",
                format!("({})", manifest.target_framework).dimmed()
            )?;
            writeln!(
                writer,
                ": {} {}, {} kept",
                removed.to_string().green(),
                self.removed_verb(),
                kept.to_string().dimmed()
            )
        } else {
            writeln!(
                writer,
                "{}{} ({}): {} {}, {} kept",
                prefix,
                path_display,
                manifest.target_framework,
                removed,
                self.removed_verb(),
                kept
            )
        }
    }

    /// Format a project with its removals and kept references
    fn format_manifest_report(
        &self,
        manifest: &ManifestReport,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let redundant = manifest.has_removals() || !manifest.kept.is_empty();

        if !redundant {
            if self.verbosity == Verbosity::Verbose {
                let line = format!(
                    "{} ({}): nothing to remove, {} reference(s) declared",
                    manifest.path.display(),
                    manifest.target_framework,
                    manifest.declared.len()
                );
                if self.color {
                    writeln!(writer, "{}", line.dimmed())?;
                } else {
                    writeln!(writer, "{}", line)?;
                }
                writeln!(writer)?;
            }
            return Ok(());
        }

        self.format_header(manifest, writer)?;

        let width = Self::max_name_length(manifest).max(20);

        for removal in &manifest.removals {
            let via = removal.reached_by.join(", ");
            if self.color {
                writeln!(
                    writer,
                    "  {} {} {}",
                    "-".red(),
                    format!("{:width$}", removal.name, width = width).bright_white(),
                    format!("via {}", via).dimmed()
                )?;
            } else {
                writeln!(
                    writer,
                    "  - {:width$} via {}",
                    removal.name,
                    via,
                    width = width
                )?;
            }
        }

        for kept in &manifest.kept {
            let reason = self.format_keep_reason(kept.reason);
            if self.color {
                writeln!(
                    writer,
                    "  {} {} {}",
                    "=".yellow(),
                    format!("{:width$}", kept.name, width = width),
                    format!("({})", reason).dimmed()
                )?;
            } else {
                writeln!(
                    writer,
                    "  = {:width$} ({})",
                    kept.name,
                    reason,
                    width = width
                )?;
            }
        }

        if self.verbosity == Verbosity::Verbose && !manifest.declared.is_empty() {
            let declared: Vec<String> = manifest.declared.iter().map(|d| d.to_string()).collect();
            if self.color {
                writeln!(
                    writer,
                    "  {} {}",
                    "Declared:".dimmed(),
                    declared.join(", ").dimmed()
                )?;
            } else {
                writeln!(writer, "  Declared: {}", declared.join(", "))?;
            }
        }

        writeln!(writer)?;
        Ok(())
    }

    /// Removal and keep counts grouped by target framework
    fn count_by_framework(summary: &PruneSummary) -> BTreeMap<&str, (usize, usize, usize)> {
        let mut counts: BTreeMap<&str, (usize, usize, usize)> = BTreeMap::new();
        for manifest in &summary.manifests {
            let entry = counts
                .entry(manifest.target_framework.as_str())
                .or_insert((0, 0, 0));
            entry.0 += 1;
            entry.1 += manifest.removal_count();
            entry.2 += manifest.kept_count();
        }
        counts
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        // In quiet mode, only show summary
        if self.verbosity == Verbosity::Quiet {
            return self.format_summary(&result.summary, writer);
        }

        for manifest in &result.summary.manifests {
            self.format_manifest_report(manifest, writer)?;
        }

        if !result.errors.is_empty() {
            if self.color {
                writeln!(writer, "{}:", "Errors".red().bold())?;
            } else {
                writeln!(writer, "Errors:")?;
            }
            for error in &result.errors {
                if self.color {
                    writeln!(writer, "  {} {}", "✗".red(), error)?;
                } else {
                    writeln!(writer, "  - {}", error)?;
                }
            }
            writeln!(writer)?;
        }

        self.format_summary(&result.summary, writer)
    }

    fn format_summary(
        &self,
        summary: &PruneSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let prefix = self.dry_run_prefix();
        let removals = summary.total_removals();
        let kept = summary.total_kept();
        let affected = summary
            .manifests
            .iter()
            .filter(|m| m.has_removals())
            .count();

        if self.verbosity == Verbosity::Quiet {
            if removals > 0 {
                if self.color {
                    writeln!(
                        writer,
                        "{}{} {}",
                        prefix,
                        removals.to_string().green(),
                        self.removed_verb()
                    )?;
                } else {
                    writeln!(writer, "{}{} {}", prefix, removals, self.removed_verb())?;
                }
            } else if self.color {
                writeln!(writer, "{}{}", prefix, "Nothing to remove".dimmed())?;
            } else {
                writeln!(writer, "{}Nothing to remove", prefix)?;
            }
            return Ok(());
        }

        let verb = if self.dry_run {
            "can be removed"
        } else {
            "removed"
        };

        if self.color {
            writeln!(writer, "{}{}:", prefix, "Summary".bold())?;
            if removals > 0 {
                writeln!(
                    writer,
                    "  {} reference(s) {} from {} project(s)",
                    removals.to_string().green(),
                    verb,
                    affected
                )?;
            } else {
                writeln!(writer, "  {}", "No redundant references".dimmed())?;
            }
            if kept > 0 {
                writeln!(
                    writer,
                    "  {} redundant reference(s) kept",
                    kept.to_string().yellow()
                )?;
            }
            writeln!(
                writer,
                "  {} project(s) analyzed",
                summary.files_processed().to_string().dimmed()
            )?;
        } else {
            writeln!(writer, "{}Summary:", prefix)?;
            if removals > 0 {
                writeln!(
                    writer,
                    "  {} reference(s) {} from {} project(s)",
                    removals, verb, affected
                )?;
            } else {
                writeln!(writer, "  No redundant references")?;
            }
            if kept > 0 {
                writeln!(writer, "  {} redundant reference(s) kept", kept)?;
            }
            writeln!(
                writer,
                "  {} project(s) analyzed",
                summary.files_processed()
            )?;
        }

        if self.verbosity == Verbosity::Verbose && !summary.manifests.is_empty() {
            writeln!(writer)?;
            if self.color {
                writeln!(writer, "{}:", "By target framework".dimmed())?;
            } else {
                writeln!(writer, "By target framework:")?;
            }
            for (framework, (projects, removed, kept)) in Self::count_by_framework(summary) {
                if self.color {
                    writeln!(
                        writer,
                        "  {}: {} project(s), {} {}, {} kept",
                        framework.cyan(),
                        projects,
                        removed.to_string().green(),
                        self.removed_verb(),
                        kept.to_string().dimmed()
                    )?;
                } else {
                    writeln!(
                        writer,
                        "  {}: {} project(s), {} {}, {} kept",
                        framework,
                        projects,
                        removed,
                        self.removed_verb(),
                        kept
                    )?;
                }
            }
        }

        Ok(())
    }

    fn format_manifest(
        &self,
        manifest: &ManifestReport,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        self.format_manifest_report(manifest, writer)
    }
}
