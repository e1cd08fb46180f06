//! Unified error types for session control.

use std::fmt;

// ---------------------------------------------------------------------------
// SessionError
// ---------------------------------------------------------------------------

/// Errors raised by the session core (driver, sequencer, capture, tracker).
#[derive(Debug)]
pub enum SessionError {
    /// The terminal-multiplexing host binary could not be located.
    HostUnavailable(String),
    /// The named session does not exist on the host.
    SessionNotFound(String),
    /// No interactive operation is registered under this id.
    OperationNotFound(String),
    /// The host rejected session creation.
    CreateFailed(String),
    /// The host could not produce a screen capture.
    CaptureFailed(String),
    /// The host refused literal text or key injection.
    InjectFailed(String),
    /// Any other host process failure (listing, kill, existence probe).
    HostFailed(String),
    /// Symbolic token with no entry in the translation table.
    UnknownToken(String),
    /// Timed-pause token with an invalid shape, magnitude, or unit.
    MalformedPause(String),
    /// Interactive operation is not in the state the call requires.
    InvalidState { id: String, status: String },
    /// First failing token of a command sequence (1-based index).
    TokenFailed {
        index: usize,
        token: String,
        source: Box<SessionError>,
    },
}

impl SessionError {
    /// True for both session and operation lookups that found nothing.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::SessionNotFound(_) | Self::OperationNotFound(_) => true,
            Self::TokenFailed { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HostUnavailable(msg) => write!(f, "host unavailable: {msg}"),
            Self::SessionNotFound(name) => write!(f, "session '{name}' does not exist"),
            Self::OperationNotFound(id) => write!(f, "operation with session ID '{id}' not found"),
            Self::CreateFailed(msg) => write!(f, "failed to create session: {msg}"),
            Self::CaptureFailed(msg) => write!(f, "failed to capture screen: {msg}"),
            Self::InjectFailed(msg) => write!(f, "failed to send input: {msg}"),
            Self::HostFailed(msg) => write!(f, "host command failed: {msg}"),
            Self::UnknownToken(token) => write!(f, "unknown special command: {token}"),
            Self::MalformedPause(msg) => write!(f, "invalid sleep command: {msg}"),
            Self::InvalidState { id, status } => {
                write!(f, "operation '{id}' is not active (status: {status})")
            }
            Self::TokenFailed {
                index,
                token,
                source,
            } => write!(f, "failed to execute command {index} ('{token}'): {source}"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TokenFailed { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ToolError
// ---------------------------------------------------------------------------

/// Errors surfaced by the named-tool layer.
#[derive(Debug)]
pub enum ToolError {
    /// The caller supplied arguments the tool couldn't parse.
    InvalidArguments(String),
    /// The tool ran but the core reported a failure.
    ExecutionFailed(String),
}

impl ToolError {
    /// Wrap a core error with an operation-specific prefix.
    pub fn failed(context: &str, err: SessionError) -> Self {
        Self::ExecutionFailed(format!("{context}: {err}"))
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArguments(msg) => write!(f, "invalid arguments: {msg}"),
            Self::ExecutionFailed(msg) => write!(f, "execution failed: {msg}"),
        }
    }
}

impl std::error::Error for ToolError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when loading or parsing configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Toml(e) => write!(f, "toml: {e}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}

// ---------------------------------------------------------------------------
// AppError (top-level)
// ---------------------------------------------------------------------------

/// Top-level error type for the command-line driver.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Session(SessionError),
    Tool(ToolError),
    /// Malformed request line in batch mode.
    Request(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Session(e) => write!(f, "{e}"),
            Self::Tool(e) => write!(f, "{e}"),
            Self::Request(msg) => write!(f, "bad request: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        Self::Session(e)
    }
}

impl From<ToolError> for AppError {
    fn from(e: ToolError) -> Self {
        Self::Tool(e)
    }
}
