//! Stage progress reporting for long renders

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::sync::{LazyLock, Mutex, PoisonError};

/// Receives progress of the named pipeline stages
///
/// Stages report from worker threads, so every method takes `&self`.
pub trait ProgressSink: Sync {
    /// A stage starts with `total` units of work
    fn begin(&self, stage: &'static str, total: u64);

    /// `units` more units of `stage` are done
    fn advance(&self, stage: &'static str, units: u64);

    /// A stage is complete
    fn finish(&self, stage: &'static str);
}

/// Discards all progress
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgress;

impl ProgressSink for SilentProgress {
    fn begin(&self, _stage: &'static str, _total: u64) {}

    fn advance(&self, _stage: &'static str, _units: u64) {}

    fn finish(&self, _stage: &'static str) {}
}

static STAGE_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    let bar = format!("[{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}]");
    ProgressStyle::default_bar()
        .template(&format!("{{prefix:>8}} [{{elapsed_precise}}] {bar} {{pos}}/{{len}} {{msg}}"))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Terminal progress display with one bar per stage
pub struct ProgressManager {
    multi_progress: MultiProgress,
    bars: Mutex<HashMap<&'static str, ProgressBar>>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a progress manager drawing to stderr
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            bars: Mutex::new(HashMap::new()),
        }
    }

    /// Remove all bars from the terminal
    pub fn clear(&self) {
        let _ = self.multi_progress.clear();
    }

    fn bar(&self, stage: &'static str) -> Option<ProgressBar> {
        self.bars
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(stage)
            .cloned()
    }
}

impl ProgressSink for ProgressManager {
    fn begin(&self, stage: &'static str, total: u64) {
        let bar = self.multi_progress.add(ProgressBar::new(total));
        bar.set_style(STAGE_STYLE.clone());
        bar.set_prefix(stage);
        self.bars
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(stage, bar);
    }

    fn advance(&self, stage: &'static str, units: u64) {
        if let Some(bar) = self.bar(stage) {
            bar.inc(units);
        }
    }

    fn finish(&self, stage: &'static str) {
        if let Some(bar) = self.bar(stage) {
            bar.finish_with_message("✓");
        }
    }
}
