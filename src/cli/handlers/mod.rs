//! Command handlers for the CLI.

mod completions;
mod setup;

pub use completions::handle_completions;
pub use setup::handle_setup;

use crate::setup::Reporter;

// ===========================================
// Shared Utilities
// ===========================================

/// Reporter that prints to stdout/stderr.
///
/// Informational lines are suppressed when `quiet` is set, so machine-readable
/// output on stdout stays clean.
pub(crate) struct ConsoleReporter {
    quiet: bool,
}

impl ConsoleReporter {
    pub(crate) fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Reporter for ConsoleReporter {
    fn info(&mut self, line: &str) {
        if !self.quiet {
            println!("{line}");
        }
    }

    fn error(&mut self, line: &str) {
        eprintln!("error: {line}");
    }
}
