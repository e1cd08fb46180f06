//! Command-token parsing and host key translation.
//!
//! A token wrapped in `<...>` is symbolic; anything else is literal text.
//! Parsing happens once, up front, into [`Token`] so the sequencer dispatches
//! on a tagged variant and never re-inspects strings.

use std::time::Duration;

use crate::error::SessionError;

/// Named keys and their tmux key names. Case-sensitive on the left.
const NAMED_KEYS: [(&str, &str); 15] = [
    ("ENTER", "Enter"),
    ("ESC", "Escape"),
    ("ESCAPE", "Escape"),
    ("TAB", "Tab"),
    ("BACKSPACE", "BSpace"),
    ("DELETE", "Delete"),
    ("UP", "Up"),
    ("DOWN", "Down"),
    ("LEFT", "Left"),
    ("RIGHT", "Right"),
    ("HOME", "Home"),
    ("END", "End"),
    ("PAGEUP", "PPage"),
    ("PAGEDOWN", "NPage"),
    ("SPACE", "Space"),
];

const PAUSE_KEYWORD: &str = "SLEEP";

/// Modifier accepted in `<MOD+X>` combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Ctrl,
    Alt,
}

impl Modifier {
    fn host_prefix(self) -> &'static str {
        match self {
            Self::Ctrl => "C-",
            Self::Alt => "M-",
        }
    }
}

/// One parsed item of a command sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Raw text typed as-is.
    Literal(String),
    /// Fixed-table key, already resolved to its host name.
    NamedKey(&'static str),
    /// `CTRL+X` / `ALT+X`; `key` keeps the caller's spelling.
    Modifier { modifier: Modifier, key: String },
    /// Timed pause, performed by the sequencer itself.
    Pause(Duration),
    /// Symbolic token with no translation.
    Unrecognized(String),
    /// `SLEEP` directive whose shape, magnitude, or unit is invalid.
    MalformedPause { raw: String, reason: String },
}

impl Token {
    /// Parse one caller-supplied token.
    pub fn parse(raw: &str) -> Self {
        let Some(inner) = symbolic_inner(raw) else {
            return Self::Literal(raw.to_string());
        };

        if inner == PAUSE_KEYWORD || inner.starts_with("SLEEP ") {
            return match parse_pause(inner) {
                Ok(duration) => Self::Pause(duration),
                Err(reason) => Self::MalformedPause {
                    raw: raw.to_string(),
                    reason,
                },
            };
        }

        if let Some(key) = inner.strip_prefix("CTRL+") {
            return modifier_token(Modifier::Ctrl, key, raw);
        }
        if let Some(key) = inner.strip_prefix("ALT+") {
            return modifier_token(Modifier::Alt, key, raw);
        }

        match NAMED_KEYS.iter().find(|(name, _)| *name == inner) {
            Some((_, host)) => Self::NamedKey(*host),
            None => Self::Unrecognized(raw.to_string()),
        }
    }

    /// Host key instruction for key-like tokens; `None` for everything else.
    pub fn host_key(&self) -> Option<String> {
        match self {
            Self::NamedKey(host) => Some((*host).to_string()),
            Self::Modifier { modifier, key } => Some(format!(
                "{}{}",
                modifier.host_prefix(),
                key.to_lowercase()
            )),
            _ => None,
        }
    }

    pub fn is_pause(&self) -> bool {
        matches!(self, Self::Pause(_))
    }

    /// Short kind label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Literal(_) => "literal",
            Self::NamedKey(_) => "key",
            Self::Modifier { .. } => "modifier",
            Self::Pause(_) => "pause",
            Self::Unrecognized(_) => "unrecognized",
            Self::MalformedPause { .. } => "malformed-pause",
        }
    }
}

/// Translate a symbolic token's inner name (delimiters removed).
///
/// Pause directives are not keys: they yield `MalformedPause` when invalid and
/// `UnknownToken` otherwise, which keeps this a pure lookup.
pub fn translate(name: &str) -> Result<String, SessionError> {
    let wrapped = format!("<{name}>");
    match Token::parse(&wrapped) {
        Token::MalformedPause { reason, .. } => Err(SessionError::MalformedPause(reason)),
        token => token
            .host_key()
            .ok_or(SessionError::UnknownToken(wrapped)),
    }
}

/// Parse `SLEEP <n>ms` / `SLEEP <n>s` (inner text, delimiters removed).
pub fn parse_pause(inner: &str) -> Result<Duration, String> {
    let parts: Vec<&str> = inner.split(' ').collect();
    if parts.len() != 2 || parts[0] != PAUSE_KEYWORD {
        return Err(format!(
            "invalid sleep command format: {inner} (expected 'SLEEP <n>ms' or 'SLEEP <n>s')"
        ));
    }
    let amount = parts[1];

    if let Some(ms) = amount.strip_suffix("ms") {
        let millis = ms
            .parse::<u64>()
            .map_err(|_| format!("invalid milliseconds value: {ms}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(secs) = amount.strip_suffix('s') {
        let seconds = secs
            .parse::<f64>()
            .map_err(|_| format!("invalid seconds value: {secs}"))?;
        return Duration::try_from_secs_f64(seconds)
            .map_err(|_| format!("invalid seconds value: {secs}"));
    }
    Err(format!("sleep time must end with 'ms' or 's': {amount}"))
}

fn symbolic_inner(raw: &str) -> Option<&str> {
    raw.strip_prefix('<')?.strip_suffix('>')
}

fn modifier_token(modifier: Modifier, key: &str, raw: &str) -> Token {
    if key.is_empty() {
        return Token::Unrecognized(raw.to_string());
    }
    Token::Modifier {
        modifier,
        key: key.to_string(),
    }
}
