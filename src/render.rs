//! Status output on stderr.
//!
//! Tool results go to stdout untouched; everything the operator reads about
//! the run itself (errors, warnings, init results) goes through [`Renderer`].

use crossterm::style::{Color, Stylize};

const LABEL_WARNING: &str = "warning:";
const LABEL_ERROR: &str = "error:";
const INDENT_1: &str = "  ";

/// Handles operator-facing terminal output.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    /// Whether ANSI color/style output is enabled.
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn error(&self, msg: &str) {
        eprintln!("{}", self.error_line(msg));
    }

    pub fn warn(&self, msg: &str) {
        eprintln!("{}", self.warn_line(msg));
    }

    /// Small section header.
    pub fn section(&self, title: &str) {
        if self.color {
            eprintln!("{} {}", "•".with(Color::DarkGrey), title.bold());
        } else {
            eprintln!("{title}:");
        }
    }

    /// Indented `key: value` line.
    pub fn field(&self, key: &str, value: &str) {
        if self.color {
            eprintln!(
                "{INDENT_1}{} {}",
                format!("{key}:").with(Color::DarkGrey),
                value.with(Color::White)
            );
        } else {
            eprintln!("{INDENT_1}{key}: {value}");
        }
    }

    fn error_line(&self, msg: &str) -> String {
        if self.color {
            format!("{} {msg}", LABEL_ERROR.with(Color::Red).bold())
        } else {
            format!("{LABEL_ERROR} {msg}")
        }
    }

    fn warn_line(&self, msg: &str) -> String {
        if self.color {
            format!("{} {msg}", LABEL_WARNING.with(Color::Yellow).bold())
        } else {
            format!("{LABEL_WARNING} {msg}")
        }
    }
}
