//! Default configuration constants.
//!
//! Keeping defaults in one module lets types, loader tests, and the CLI share
//! the same literals.

/// Host program resolved on `PATH`.
pub(super) const DEFAULT_HOST_BINARY: &str = "tmux";
/// Fixed session geometry.
pub(super) const DEFAULT_WIDTH: u16 = 80;
pub(super) const DEFAULT_HEIGHT: u16 = 24;
/// Wait after create/attach before returning.
pub(super) const DEFAULT_SETTLE_MS: u64 = 200;
/// `send_commands` inter-token delay when the caller omits one.
pub(super) const DEFAULT_DELAY_MS: u64 = 100;
pub(super) const DEFAULT_INTERACTIVE_START_SETTLE_MS: u64 = 300;
pub(super) const DEFAULT_INTERACTIVE_RESPOND_SETTLE_MS: u64 = 200;
pub(super) const DEFAULT_GIT_ADD_PATCH_COMMAND: &str = "git add -p";
pub(super) const DEFAULT_SENTINEL: &str = "EXIT_STATUS:";
pub(super) const DEFAULT_EXECUTE_KEY: &str = "Enter";
pub(super) const DEFAULT_LOG_FILTER: &str = "ttypilot=info";

/// Local config file name, also used under the global config directory.
pub(super) const CONFIG_FILE_NAME: &str = "ttypilot.toml";
/// Directory under the platform config root.
pub(super) const CONFIG_DIR_NAME: &str = "ttypilot";

/// Top-level tables understood by the loader.
pub(super) const KNOWN_SECTIONS: [&str; 5] = ["host", "timing", "capture", "interactive", "log"];

/// Commented config written by `ttypilot init`.
pub(super) const DEFAULT_CONFIG_TEMPLATE: &str = include_str!("../templates/ttypilot.toml");
