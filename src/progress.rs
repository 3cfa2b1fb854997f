//! Progress display for project analysis
//!
//! A spinner covers project discovery, then a bar counts analyzed projects
//! and names the one that was collected last. Everything is a no-op when
//! disabled (quiet and JSON modes).

use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

/// Progress reporter for the prune workflow
pub struct Progress {
    enabled: bool,
    bar: Option<ProgressBar>,
}

impl Progress {
    pub fn new(enabled: bool) -> Self {
        Self { enabled, bar: None }
    }

    /// Spinner shown while project files are being discovered
    pub fn detecting(&mut self, root: &Path) {
        if !self.enabled {
            return;
        }

        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
        {
            spinner.set_style(style);
        }
        spinner.set_message(format!("Searching {} for projects...", root.display()));
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.bar = Some(spinner);
    }

    /// Replace the spinner with a bar over `projects` manifests
    pub fn analyzing(&mut self, projects: usize) {
        self.finish();
        if !self.enabled {
            return;
        }

        let bar = ProgressBar::new(projects as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.cyan} Analyzing {msg} [{bar:30.cyan/blue}] {pos}/{len}")
        {
            bar.set_style(style.progress_chars("█▓▒░"));
        }
        bar.enable_steady_tick(Duration::from_millis(100));
        self.bar = Some(bar);
    }

    /// Count one project as done, showing its file name
    pub fn project_done(&self, manifest: &Path) {
        if let Some(ref bar) = self.bar {
            let name = manifest
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            bar.set_message(name);
            bar.inc(1);
        }
    }

    /// Remove whatever is on screen
    pub fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}
