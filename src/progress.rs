//! Progress UI utilities (spinners, status messages) for the CLI.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner for long-running operations
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
                .template("{spinner:.cyan} {msg}")
                .expect("valid template"),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }

    /// Finish with a success message (green checkmark)
    pub fn finish_success(&self, message: &str) {
        self.bar.finish_and_clear();
        println!("{} {}", style("✓").green().bold(), message);
    }

    /// Clear the spinner without a message
    pub fn finish_clear(&self) {
        self.bar.finish_and_clear();
    }
}

/// Print a success message (green checkmark)
pub fn success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print a warning message (yellow)
pub fn warning(message: &str) {
    println!("{} {}", style("⚠").yellow().bold(), message);
}

/// Print an error message (red)
pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), message);
}
