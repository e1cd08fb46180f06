//! Configuration loading from TOML files and environment variables.
//!
//! Config is loaded in this order of precedence (highest wins):
//! 1. Environment variables (`TTYPILOT_TMUX_BIN`, `TTYPILOT_SETTLE_MS`,
//!    `TTYPILOT_DEFAULT_DELAY_MS`, `TTYPILOT_LOG`)
//! 2. TOML file specified via --config CLI flag
//! 3. ./ttypilot.toml in the current directory
//! 4. $XDG_CONFIG_HOME/ttypilot/ttypilot.toml (or the platform config dir)
//! 5. Built-in defaults

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

mod defaults;
mod env;
mod init;
mod sources;
mod types;

use defaults::KNOWN_SECTIONS;
use env::apply_env_overrides;
pub use init::{
    config_root_dir, default_global_config_path, initialize_default_global_config,
    GlobalConfigInitResult,
};
use sources::read_config_text_with_sources;
pub use types::{
    CaptureConfig, Config, ConfigDiagnostics, ConfigSource, HostConfig, InteractiveConfig,
    LoadedConfig, LogConfig, TimingConfig,
};

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load configuration from disk and environment.
///
/// `path_override` is an explicit config file path (from --config flag).
pub fn load_config(path_override: Option<&str>) -> Result<Config, ConfigError> {
    Ok(load_config_with_diagnostics(path_override)?.config)
}

/// Load configuration and return the source plus non-fatal diagnostics.
pub fn load_config_with_diagnostics(
    path_override: Option<&str>,
) -> Result<LoadedConfig, ConfigError> {
    load_config_with_diagnostics_from_sources(
        path_override,
        |path| std::fs::read_to_string(path),
        |name| std::env::var(name).ok(),
        config_root_dir,
    )
}

fn load_config_with_diagnostics_from_sources<FRead, FEnv, FRoot>(
    path_override: Option<&str>,
    read_file: FRead,
    env_lookup: FEnv,
    config_root: FRoot,
) -> Result<LoadedConfig, ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FEnv: Fn(&str) -> Option<String>,
    FRoot: Fn() -> Option<PathBuf>,
{
    let (config_text, source) =
        read_config_text_with_sources(path_override, &read_file, &config_root)?;
    let mut diagnostics = ConfigDiagnostics::default();

    let table: toml::Table = toml::from_str(&config_text)?;
    collect_unknown_section_warnings(&table, &mut diagnostics);
    let mut config: Config = toml::Value::Table(table).try_into()?;

    apply_env_overrides(&mut config, &env_lookup)?;
    validate(&config)?;

    Ok(LoadedConfig {
        config,
        source,
        diagnostics,
    })
}

fn collect_unknown_section_warnings(table: &toml::Table, diagnostics: &mut ConfigDiagnostics) {
    for key in table.keys() {
        if !KNOWN_SECTIONS.contains(&key.as_str()) {
            diagnostics
                .warnings
                .push(format!("unknown config section `{key}` ignored"));
        }
    }
}

/// Reject values the core cannot run with.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.host.binary.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "host.binary must name the tmux executable".into(),
        ));
    }
    if config.host.width == 0 || config.host.height == 0 {
        return Err(ConfigError::Invalid(format!(
            "host geometry must be non-zero, got {}x{}",
            config.host.width, config.host.height
        )));
    }
    let sentinel = &config.interactive.sentinel;
    if sentinel.is_empty() {
        return Err(ConfigError::Invalid(
            "interactive.sentinel must not be empty".into(),
        ));
    }
    // The sentinel is echoed inside double quotes by the shell.
    if sentinel.contains(['"', '$', '`', '\\', '\n']) {
        return Err(ConfigError::Invalid(format!(
            "interactive.sentinel `{sentinel}` must not contain quotes, `$`, backticks, backslashes, or newlines"
        )));
    }
    if sentinel.ends_with(|c: char| c.is_ascii_digit()) {
        return Err(ConfigError::Invalid(format!(
            "interactive.sentinel `{sentinel}` must not end with a digit"
        )));
    }
    if config.interactive.execute_key.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "interactive.execute_key must not be empty".into(),
        ));
    }
    if config.interactive.git_add_patch_command.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "interactive.git_add_patch_command must not be empty".into(),
        ));
    }
    Ok(())
}
