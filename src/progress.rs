//! Terminal progress for a run
//!
//! A spinner covers graph generation and restores, whose length is unknown;
//! a bar covers version resolution, which has a known request count.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const SPINNER_TEMPLATE: &str = "{spinner:.cyan} {msg}";
const BAR_TEMPLATE: &str = "{spinner:.cyan} {msg} [{bar:30.cyan/blue}] {pos}/{len}";

/// Progress reporter; every method is a no-op when disabled
pub struct Progress {
    enabled: bool,
    bar: Option<ProgressBar>,
}

impl Progress {
    pub fn new(enabled: bool) -> Self {
        Self { enabled, bar: None }
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    /// Show a spinner for an indeterminate step
    pub fn spinner(&mut self, message: &str) {
        if !self.enabled {
            return;
        }

        let style = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template(SPINNER_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        self.replace(ProgressBar::new_spinner().with_style(style), message, 80);
    }

    /// Show a bar over `total` version lookups
    pub fn start(&mut self, total: u64, message: &str) {
        if !self.enabled {
            return;
        }

        let style = ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)
            .map(|style| style.progress_chars("█▓▒░"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        self.replace(ProgressBar::new(total).with_style(style), message, 100);
    }

    fn replace(&mut self, bar: ProgressBar, message: &str, tick_ms: u64) {
        if let Some(old) = self.bar.take() {
            old.finish_and_clear();
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(tick_ms));
        self.bar = Some(bar);
    }

    pub fn inc(&self) {
        if let Some(ref bar) = self.bar {
            bar.inc(1);
        }
    }

    pub fn set_message(&self, message: &str) {
        if let Some(ref bar) = self.bar {
            bar.set_message(message.to_string());
        }
    }

    pub fn finish_and_clear(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        self.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_disabled() {
        let mut progress = Progress::disabled();
        assert!(!progress.enabled);
        progress.spinner("Restoring App.csproj");
        progress.start(10, "Resolving latest versions");
        progress.inc();
        progress.set_message("Serilog");
        progress.finish_and_clear();
        assert!(progress.bar.is_none());
    }

    #[test]
    fn test_spinner_replaced_by_bar() {
        let mut progress = Progress::new(true);
        progress.spinner("Generating dependency graph");
        assert!(progress.bar.is_some());
        progress.start(3, "Resolving latest versions");
        progress.inc();
        progress.inc();
        assert_eq!(progress.bar.as_ref().map(|b| b.position()), Some(2));
        progress.finish_and_clear();
        assert!(progress.bar.is_none());
    }
}
