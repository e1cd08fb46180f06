//! Terminal-multiplexing host contract.
//!
//! The core never talks to a multiplexer directly: it goes through
//! [`TerminalHost`], which models exactly the host capabilities sessions need.
//! Every call is an isolated request/response; implementations hold no
//! per-session state and never retry.

pub mod process;
pub mod tmux;

use async_trait::async_trait;

use crate::error::SessionError;

pub use tmux::TmuxHost;

/// Parameters for creating one detached session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSession {
    pub name: String,
    pub width: u16,
    pub height: u16,
    /// Start directory; the host default applies when `None`.
    pub working_dir: Option<String>,
    /// Program to run instead of an interactive shell.
    pub command: Option<String>,
}

/// Capabilities the session core consumes from the external host.
///
/// Session names are matched exactly: a call naming `dev` must never reach
/// `dev-view` or any other session that merely shares a prefix.
#[async_trait]
pub trait TerminalHost: Send + Sync {
    /// Create a detached session.
    async fn new_session(&self, request: &NewSession) -> Result<(), SessionError>;

    /// Type `text` verbatim using the host's literal-input mode.
    async fn send_literal(&self, session: &str, text: &str) -> Result<(), SessionError>;

    /// Send one host key instruction (for tmux: `Enter`, `C-c`, `M-x`, ...).
    async fn send_key(&self, session: &str, key: &str) -> Result<(), SessionError>;

    /// Rendered pane buffer; `with_escapes` keeps attribute sequences.
    async fn capture(&self, session: &str, with_escapes: bool) -> Result<String, SessionError>;

    async fn has_session(&self, session: &str) -> Result<bool, SessionError>;

    /// Host session listing, in the host's own format.
    async fn list_sessions(&self) -> Result<String, SessionError>;

    /// Create `new_name` in the same session group as `target`.
    async fn new_linked_session(&self, new_name: &str, target: &str) -> Result<(), SessionError>;

    async fn kill_session(&self, session: &str) -> Result<(), SessionError>;
}
