//! Compile-time build metadata exposed to the CLI.

/// Semver package version from `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// VCS commit hash captured at build time.
pub const GIT_COMMIT: &str = env!("TTYPILOT_BUILD_GIT_HASH");

/// Build timestamp captured at compile time.
pub const BUILD_TIMESTAMP: &str = env!("TTYPILOT_BUILD_TIMESTAMP");

/// Help trailer block that surfaces build metadata in `ttypilot --help`.
pub const HELP_BUILD_METADATA: &str = concat!(
    "Build metadata:\n  commit: ",
    env!("TTYPILOT_BUILD_GIT_HASH"),
    "\n  built: ",
    env!("TTYPILOT_BUILD_TIMESTAMP")
);

/// Version block used by `ttypilot --version`.
pub fn cli_version_text() -> String {
    format!("ttypilot {VERSION}\ncommit: {GIT_COMMIT}\nbuilt: {BUILD_TIMESTAMP}")
}
