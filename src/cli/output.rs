//! Output system for turbomypy
//!
//! Provides consistent, styled output for the wrapper's own progress
//! messages. Mypy's output is never touched; these messages frame it.

use console::style;
use std::time::Duration;

/// Output handler for consistent CLI formatting
pub struct Output {
    quiet: bool,
}

impl Output {
    /// Create a new output handler
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Create an output handler from the environment
    ///
    /// Quiet mode comes from `TURBOMYPY_QUIET` rather than a flag, since the
    /// flag namespace belongs to mypy.
    pub fn from_env() -> Self {
        let quiet = matches!(std::env::var("TURBOMYPY_QUIET"), Ok(v) if !v.is_empty() && v != "0");
        Self::new(quiet)
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("ℹ").blue(), message);
        }
    }

    /// Print a step in a process
    pub fn step(&self, step: &str) {
        if !self.quiet {
            println!("{} {}", style("❯").cyan(), step);
        }
    }

    /// Print an elapsed-time summary for a completed step
    pub fn timing(&self, label: &str, elapsed: Duration) {
        if !self.quiet {
            println!(
                "{} {}",
                style("⏱").cyan(),
                style(format!("{} took {:.2}s", label, elapsed.as_secs_f64())).dim()
            );
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        // Errors are always shown, even in quiet mode
        eprintln!("{} {}", style("✖").red(), message);
    }
}
