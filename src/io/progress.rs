//! Progress display for the indexing, selection, and assembly phases

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static PHASE_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {msg}: [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// One progress bar covering one pipeline phase
///
/// Workers on any thread report through `inc`; a quiet run swaps the
/// bar for a hidden one so call sites stay unconditional.
pub struct TaskProgress {
    bar: ProgressBar,
}

impl TaskProgress {
    /// Start a phase bar with a known unit count
    pub fn start(label: &str, length: u64, quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new(length);
            bar.set_style(PHASE_STYLE.clone());
            bar.set_message(label.to_string());
            bar
        };
        Self { bar }
    }

    /// Adjust the unit count once the phase knows it
    pub fn set_length(&self, length: u64) {
        self.bar.set_length(length);
    }

    /// Record one completed unit
    pub fn inc(&self) {
        self.bar.inc(1);
    }

    /// Close out the phase display
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
