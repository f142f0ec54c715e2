//! Terminal output for a protocol run — spinner and colored messages.
//!
//! Uses `indicatif` for the progress spinner and `console` for color
//! styling. [`RunProgress`] tracks a run visually: the spinner message
//! follows the step currently executing, completion is green, an abort
//! red.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::run::{RunOutcome, RunReport};

/// Visual progress indicator for a protocol run.
pub struct RunProgress {
    pb: ProgressBar,
    green: Style,
    red: Style,
    yellow: Style,
}

impl RunProgress {
    /// Starts the spinner for the given protocol and returns the tracker.
    pub fn start(protocol: &str, sample_count: u32) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("invalid template"),
        );
        pb.set_message(format!("{protocol}: {sample_count} samples"));
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            pb,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
        }
    }

    /// A tracker that draws nothing; used by tests and quiet callers.
    pub fn hidden() -> Self {
        Self {
            pb: ProgressBar::hidden(),
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
        }
    }

    /// Updates the spinner to the step currently executing.
    pub fn step(&self, index: usize, total: usize, name: &str) {
        self.pb
            .set_message(format!("step {}/{total}: {name}", index + 1));
    }

    /// Finishes the spinner and prints the run's final outcome.
    pub fn complete(&self, outcome: &RunOutcome) {
        self.pb.finish_and_clear();
        match outcome {
            RunOutcome::Completed => {
                println!("  {} Run completed", self.green.apply_to("✓"));
            }
            RunOutcome::Aborted { step, reason } => {
                println!(
                    "  {} Run aborted at '{}': {}",
                    self.red.apply_to("✗"),
                    self.yellow.apply_to(step),
                    reason
                );
            }
        }
    }

    /// Finishes the spinner after an abort, printing the error message.
    pub fn fail(&self, message: &str) {
        self.pb.finish_and_clear();
        println!("  {} {message}", self.red.apply_to("✗"));
    }

    /// Prints the run report as pretty JSON under a styled header.
    pub fn print_report(&self, report: &RunReport) {
        let status_style = if report.is_completed() {
            &self.green
        } else {
            &self.red
        };
        println!();
        println!("{}", status_style.apply_to("─── Run Report ───"));
        println!(
            "{}",
            serde_json::to_string_pretty(report).unwrap_or_default()
        );
    }
}
