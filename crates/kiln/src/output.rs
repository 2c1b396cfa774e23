//! Terminal output utilities.
//!
//! Command results go to stdout; diagnostics go to stderr, colored.

use console::{Style, Term};
use serde::Serialize;

use crate::error::CliError;

/// Terminal output formatter.
pub(crate) struct Output {
    stdout: Term,
    stderr: Term,
    yellow: Style,
    red: Style,
}

impl Output {
    /// Create a new output formatter.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            stdout: Term::stdout(),
            stderr: Term::stderr(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
        }
    }

    /// Write a plain result line to stdout.
    pub(crate) fn result(&self, text: &str) -> Result<(), CliError> {
        self.stdout.write_line(text)?;
        Ok(())
    }

    /// Write a value as pretty-printed JSON to stdout.
    pub(crate) fn json<T: Serialize + ?Sized>(&self, value: &T) -> Result<(), CliError> {
        self.result(&serde_json::to_string_pretty(value)?)
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        let line = self.yellow.apply_to(msg).to_string();
        let _ = self.stderr.write_line(&line);
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let line = self.red.apply_to(msg).to_string();
        let _ = self.stderr.write_line(&line);
    }
}
