//! Configuration data model.
//!
//! Every section and key is optional in TOML; missing values take the
//! defaults from `config::defaults`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::defaults::{
    DEFAULT_DELAY_MS, DEFAULT_EXECUTE_KEY, DEFAULT_GIT_ADD_PATCH_COMMAND, DEFAULT_HEIGHT,
    DEFAULT_HOST_BINARY, DEFAULT_INTERACTIVE_RESPOND_SETTLE_MS,
    DEFAULT_INTERACTIVE_START_SETTLE_MS, DEFAULT_LOG_FILTER, DEFAULT_SENTINEL, DEFAULT_SETTLE_MS,
    DEFAULT_WIDTH,
};
use crate::driver::DriverOptions;
use crate::tracker::TrackerOptions;

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub host: HostConfig,
    pub timing: TimingConfig,
    pub capture: CaptureConfig,
    pub interactive: InteractiveConfig,
    pub log: LogConfig,
}

impl Config {
    pub fn driver_options(&self) -> DriverOptions {
        DriverOptions {
            width: self.host.width,
            height: self.host.height,
            settle: Duration::from_millis(self.timing.settle_ms),
        }
    }

    pub fn tracker_options(&self) -> TrackerOptions {
        TrackerOptions {
            start_settle: Duration::from_millis(self.timing.interactive_start_settle_ms),
            respond_settle: Duration::from_millis(self.timing.interactive_respond_settle_ms),
            sentinel: self.interactive.sentinel.clone(),
            execute_key: self.interactive.execute_key.clone(),
        }
    }

    pub fn default_delay(&self) -> Duration {
        Duration::from_millis(self.timing.default_delay_ms)
    }
}

/// `[host]`: the terminal-multiplexing program and session geometry.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct HostConfig {
    pub binary: String,
    pub width: u16,
    pub height: u16,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            binary: DEFAULT_HOST_BINARY.to_string(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

/// `[timing]`: settle and pacing delays in milliseconds.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimingConfig {
    pub settle_ms: u64,
    pub default_delay_ms: u64,
    pub interactive_start_settle_ms: u64,
    pub interactive_respond_settle_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            settle_ms: DEFAULT_SETTLE_MS,
            default_delay_ms: DEFAULT_DELAY_MS,
            interactive_start_settle_ms: DEFAULT_INTERACTIVE_START_SETTLE_MS,
            interactive_respond_settle_ms: DEFAULT_INTERACTIVE_RESPOND_SETTLE_MS,
        }
    }
}

/// `[capture]`
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct CaptureConfig {
    /// Strip SGR sequences unless a caller asks for raw output.
    pub strip_ansi: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self { strip_ansi: true }
    }
}

/// `[interactive]`: prompt-tracker protocol.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct InteractiveConfig {
    pub git_add_patch_command: String,
    pub sentinel: String,
    pub execute_key: String,
}

impl Default for InteractiveConfig {
    fn default() -> Self {
        Self {
            git_add_patch_command: DEFAULT_GIT_ADD_PATCH_COMMAND.to_string(),
            sentinel: DEFAULT_SENTINEL.to_string(),
            execute_key: DEFAULT_EXECUTE_KEY.to_string(),
        }
    }
}

/// `[log]`
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing` env-filter directive used when no env filter is set.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

/// Where the loaded config text came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicit `--config` path.
    Explicit(PathBuf),
    /// `./ttypilot.toml`.
    Local,
    /// Global config directory file.
    Global(PathBuf),
    /// No file found; built-in defaults were used.
    BuiltInDefaults,
}

/// Non-fatal findings surfaced while loading config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDiagnostics {
    pub warnings: Vec<String>,
}

/// Config plus load metadata.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub source: ConfigSource,
    pub diagnostics: ConfigDiagnostics,
}
