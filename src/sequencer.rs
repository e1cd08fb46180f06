//! Ordered token dispatch with pacing and an optional trailing capture.

use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

use crate::driver::SessionDriver;
use crate::error::SessionError;
use crate::keys::Token;

/// Per-call knobs for [`send_commands`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceOptions {
    /// Sleep after every non-pause token.
    pub inter_token_delay: Duration,
    pub capture_after: bool,
    /// Strip SGR sequences from the trailing capture.
    pub strip_control_sequences: bool,
}

impl Default for SequenceOptions {
    fn default() -> Self {
        Self {
            inter_token_delay: Duration::from_millis(100),
            capture_after: true,
            strip_control_sequences: true,
        }
    }
}

/// Result of the trailing capture step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    Screen(String),
    /// Capture failed after a successful sequence; the sequence still counts.
    Warning(String),
}

/// Structured outcome of a fully applied sequence.
///
/// `Display` renders the human-readable execution report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceReport {
    pub session: String,
    pub executed: usize,
    pub capture: Option<CaptureOutcome>,
}

impl SequenceReport {
    pub fn screen(&self) -> Option<&str> {
        match &self.capture {
            Some(CaptureOutcome::Screen(screen)) => Some(screen),
            _ => None,
        }
    }

    pub fn warning(&self) -> Option<&str> {
        match &self.capture {
            Some(CaptureOutcome::Warning(message)) => Some(message),
            _ => None,
        }
    }
}

impl fmt::Display for SequenceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Executing {} commands on session '{}':",
            self.executed, self.session
        )?;
        writeln!(f, "Commands executed successfully.")?;
        match &self.capture {
            Some(CaptureOutcome::Screen(screen)) => write!(f, "\nScreen content:\n{screen}"),
            Some(CaptureOutcome::Warning(message)) => {
                writeln!(f, "Warning: Failed to capture screen: {message}")
            }
            None => Ok(()),
        }
    }
}

/// Apply `tokens` to `session` in order.
///
/// Every token is parsed before the first one is sent. Execution stops at the
/// first failure, which is reported with its 1-based index; later tokens never
/// reach the host.
pub async fn send_commands(
    driver: &SessionDriver,
    session: &str,
    tokens: &[String],
    options: SequenceOptions,
) -> Result<SequenceReport, SessionError> {
    let parsed: Vec<Token> = tokens.iter().map(|raw| Token::parse(raw)).collect();

    for (offset, (raw, token)) in tokens.iter().zip(&parsed).enumerate() {
        let index = offset + 1;
        debug!(session, index, kind = token.kind(), "dispatching token");
        dispatch(driver, session, token)
            .await
            .map_err(|source| SessionError::TokenFailed {
                index,
                token: raw.clone(),
                source: Box::new(source),
            })?;

        if !token.is_pause() && !options.inter_token_delay.is_zero() {
            tokio::time::sleep(options.inter_token_delay).await;
        }
    }

    let capture = if options.capture_after {
        Some(
            match driver
                .capture(session, options.strip_control_sequences)
                .await
            {
                Ok(screen) => CaptureOutcome::Screen(screen),
                Err(err) => {
                    warn!(session, error = %err, "trailing capture failed");
                    CaptureOutcome::Warning(err.to_string())
                }
            },
        )
    } else {
        None
    };

    Ok(SequenceReport {
        session: session.to_string(),
        executed: tokens.len(),
        capture,
    })
}

async fn dispatch(driver: &SessionDriver, session: &str, token: &Token) -> Result<(), SessionError> {
    match token {
        Token::Literal(text) => driver.inject_literal(session, text).await,
        Token::Pause(duration) => {
            debug!(session, pause_ms = duration.as_millis() as u64, "pausing");
            tokio::time::sleep(*duration).await;
            Ok(())
        }
        Token::Unrecognized(raw) => Err(SessionError::UnknownToken(raw.clone())),
        Token::MalformedPause { reason, .. } => Err(SessionError::MalformedPause(reason.clone())),
        key => match key.host_key() {
            Some(host_key) => driver.inject_key(session, &host_key).await,
            None => Err(SessionError::UnknownToken(format!("{key:?}"))),
        },
    }
}
