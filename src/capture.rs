//! Screen capture and control-sequence normalization.
//!
//! Captures are always requested from the host with attribute escapes
//! included. Stripping is then done locally and removes SGR sequences only
//! (`ESC [ <params> m`: colors, bold, underline, reset). Cursor movement,
//! erase, OSC, and every other escape class pass through untouched; tmux
//! renders the pane grid itself, so in practice a capture carries no cursor
//! sequences to begin with.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::SessionError;
use crate::host::TerminalHost;

static SGR_SEQUENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x1b\[[0-9;:]*m").expect("valid SGR regex"));

/// Whether a capture should be reduced to plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    /// SGR sequences removed.
    Plain,
    /// Exactly what the host rendered, escapes included.
    Raw,
}

impl CaptureMode {
    pub fn from_strip(strip_control_sequences: bool) -> Self {
        if strip_control_sequences {
            Self::Plain
        } else {
            Self::Raw
        }
    }
}

/// Capture the current rendered buffer of `session`.
pub async fn capture_screen(
    host: &dyn TerminalHost,
    session: &str,
    mode: CaptureMode,
) -> Result<String, SessionError> {
    let screen = host.capture(session, true).await?;
    Ok(match mode {
        CaptureMode::Plain => strip_sgr_sequences(&screen),
        CaptureMode::Raw => screen,
    })
}

/// Remove ANSI SGR (color/attribute) sequences from `text`.
pub fn strip_sgr_sequences(text: &str) -> String {
    SGR_SEQUENCE.replace_all(text, "").into_owned()
}
