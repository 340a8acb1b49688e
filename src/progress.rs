use crate::history::format_duration;
use crate::output::{GREEN, RESET, YELLOW};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";
const BAR_TEMPLATE: &str = "{spinner:.cyan} {msg} [{bar:30.green/white}] {pos:>3}%";

// ============================================================================
// RunProgressBar: terminal rendering of a simulated run for `qarun run`
// ============================================================================

/// Progress bar mirroring a run's 0..=100 progress.
pub struct RunProgressBar {
    bar: ProgressBar,
    run_id: String,
}

impl RunProgressBar {
    pub fn new(run_id: &str, project_id: &str) -> Self {
        Self::with_bar(ProgressBar::new(100), run_id, project_id)
    }

    /// A bar that draws nothing, for non-interactive output.
    pub fn hidden(run_id: &str, project_id: &str) -> Self {
        Self::with_bar(ProgressBar::hidden(), run_id, project_id)
    }

    fn with_bar(bar: ProgressBar, run_id: &str, project_id: &str) -> Self {
        bar.set_length(100);
        let style = ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .tick_chars(SPINNER_CHARS)
            .progress_chars("█▓░");
        bar.set_style(style);
        bar.set_message(format!("{} | {}", run_id, project_id));
        bar.enable_steady_tick(Duration::from_millis(80));

        Self {
            bar,
            run_id: run_id.to_string(),
        }
    }

    pub fn set_progress(&self, progress: u8) {
        self.bar.set_position(u64::from(progress.min(100)));
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn finish_success(&self, elapsed: Duration) {
        self.bar.set_position(100);
        self.bar.finish_and_clear();
        println!(
            "{GREEN}\u{2714} {} completed in {}{RESET}",
            self.run_id,
            format_duration(elapsed)
        );
    }

    pub fn finish_cancelled(&self, progress: u8) {
        self.bar.abandon();
        println!(
            "{YELLOW}\u{2716} {} cancelled at {}%{RESET}",
            self.run_id, progress
        );
    }
}

impl Drop for RunProgressBar {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}
