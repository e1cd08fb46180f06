//! Session lifecycle against a [`TerminalHost`].
//!
//! The driver owns no per-session state. Geometry and the settle delay are
//! fixed at construction so every create/attach behaves the same way.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::capture::{capture_screen, CaptureMode};
use crate::error::SessionError;
use crate::host::{NewSession, TerminalHost};

/// Construction parameters for [`SessionDriver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverOptions {
    pub width: u16,
    pub height: u16,
    /// Wait applied after create/attach before returning.
    pub settle: Duration,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
            settle: Duration::from_millis(200),
        }
    }
}

/// Narrow session capability surface used by the sequencer and tracker.
#[derive(Clone)]
pub struct SessionDriver {
    host: Arc<dyn TerminalHost>,
    options: DriverOptions,
}

impl SessionDriver {
    pub fn new(host: Arc<dyn TerminalHost>, options: DriverOptions) -> Self {
        Self { host, options }
    }

    pub fn options(&self) -> DriverOptions {
        self.options
    }

    /// Start a detached session, then wait for the program to settle.
    pub async fn create(
        &self,
        name: &str,
        command: Option<&str>,
        working_dir: Option<&str>,
    ) -> Result<(), SessionError> {
        let request = NewSession {
            name: name.to_string(),
            width: self.options.width,
            height: self.options.height,
            working_dir: non_empty(working_dir),
            command: non_empty(command),
        };
        self.host.new_session(&request).await?;
        info!(
            session = name,
            command = request.command.as_deref().unwrap_or("<shell>"),
            "session created"
        );
        self.settle().await;
        Ok(())
    }

    /// Type `text` verbatim.
    pub async fn inject_literal(&self, name: &str, text: &str) -> Result<(), SessionError> {
        self.host.send_literal(name, text).await
    }

    /// Send one already-translated host key.
    pub async fn inject_key(&self, name: &str, host_key: &str) -> Result<(), SessionError> {
        self.host.send_key(name, host_key).await
    }

    /// Verify `name` exists and optionally add a second name in its group.
    ///
    /// Returns the name the caller should address from now on.
    pub async fn attach(&self, name: &str, as_new: Option<&str>) -> Result<String, SessionError> {
        if !self.host.has_session(name).await? {
            return Err(SessionError::SessionNotFound(name.to_string()));
        }
        let joined = match non_empty(as_new) {
            Some(new_name) => {
                self.host.new_linked_session(&new_name, name).await?;
                new_name
            }
            None => name.to_string(),
        };
        info!(session = name, joined = %joined, "session attached");
        self.settle().await;
        Ok(joined)
    }

    pub async fn destroy(&self, name: &str) -> Result<(), SessionError> {
        self.host.kill_session(name).await?;
        info!(session = name, "session destroyed");
        Ok(())
    }

    /// Host session listing, passed through unchanged.
    pub async fn list(&self) -> Result<String, SessionError> {
        self.host.list_sessions().await
    }

    pub async fn capture(&self, name: &str, strip: bool) -> Result<String, SessionError> {
        capture_screen(self.host.as_ref(), name, CaptureMode::from_strip(strip)).await
    }

    async fn settle(&self) {
        if self.options.settle.is_zero() {
            return;
        }
        debug!(settle_ms = self.options.settle.as_millis() as u64, "settling");
        tokio::time::sleep(self.options.settle).await;
    }
}

/// Blank values are absent; anything else passes through untouched.
fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .filter(|value| !value.trim().is_empty())
        .map(str::to_string)
}
