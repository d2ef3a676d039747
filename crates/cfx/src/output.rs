//! Colored terminal output utilities.

use console::{Style, Term};
use serde_json::Value;

/// Terminal output formatter.
///
/// Messages go to stderr; JSON results go to stdout.
pub(crate) struct Output {
    term: Term,
    stdout: Term,
    red: Style,
    cyan_bold: Style,
}

impl Output {
    /// Create a new output formatter.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            stdout: Term::stdout(),
            red: Style::new().red(),
            cyan_bold: Style::new().cyan().bold(),
        }
    }

    /// Print an info message.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Print a highlighted message (cyan bold).
    pub(crate) fn highlight(&self, msg: &str) {
        let _ = self
            .term
            .write_line(&self.cyan_bold.apply_to(msg).to_string());
    }

    /// Print a JSON value, pretty-printed, on stdout.
    pub(crate) fn json(&self, value: &Value) {
        let rendered = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
        let _ = self.stdout.write_line(&rendered);
    }
}
