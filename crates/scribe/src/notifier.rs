//! Terminal notifier: session messages go to stderr, stdout stays clean
//! for rendered output.

use std::io::{self, Write};

use owo_colors::OwoColorize;
use tracing::debug;

use scribe_core::{Notifier, Severity};

use crate::cli::GlobalOpts;
use crate::output;

pub struct ConsoleNotifier {
    color: bool,
    quiet: bool,
}

impl ConsoleNotifier {
    pub fn new(global: &GlobalOpts) -> Self {
        Self {
            color: output::should_color(&global.color, &io::stderr()),
            quiet: global.quiet,
        }
    }

    fn line(&self, text: &str, severity: Severity) -> String {
        let marker = match severity {
            Severity::Success => "✓",
            Severity::Warning => "!",
            Severity::Error => "✗",
        };
        if !self.color {
            return format!("{marker} {text}");
        }
        match severity {
            Severity::Success => format!("{} {text}", marker.green()),
            Severity::Warning => format!("{} {}", marker.yellow(), text.yellow()),
            Severity::Error => format!("{} {}", marker.red(), text.red()),
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn show_message(&self, text: &str, severity: Severity) {
        // Failures come back as a `CliError` and are rendered once by main.
        if severity == Severity::Error {
            debug!(%severity, %text, "left to the error report");
            return;
        }
        if self.quiet && severity != Severity::Warning {
            return;
        }
        let _ = writeln!(io::stderr().lock(), "{}", self.line(text, severity));
    }
}
