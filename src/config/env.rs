//! Environment overrides.
//!
//! `TTYPILOT_*` variables win over every file source.

use crate::error::ConfigError;

use super::Config;

pub(super) const ENV_TMUX_BIN: &str = "TTYPILOT_TMUX_BIN";
pub(super) const ENV_SETTLE_MS: &str = "TTYPILOT_SETTLE_MS";
pub(super) const ENV_DEFAULT_DELAY_MS: &str = "TTYPILOT_DEFAULT_DELAY_MS";
pub(super) const ENV_LOG: &str = "TTYPILOT_LOG";

pub(super) fn apply_env_overrides<FEnv>(
    config: &mut Config,
    env_lookup: &FEnv,
) -> Result<(), ConfigError>
where
    FEnv: Fn(&str) -> Option<String>,
{
    if let Some(binary) = non_empty_env(env_lookup, ENV_TMUX_BIN) {
        config.host.binary = binary;
    }
    if let Some(raw) = non_empty_env(env_lookup, ENV_SETTLE_MS) {
        config.timing.settle_ms = parse_millis(ENV_SETTLE_MS, &raw)?;
    }
    if let Some(raw) = non_empty_env(env_lookup, ENV_DEFAULT_DELAY_MS) {
        config.timing.default_delay_ms = parse_millis(ENV_DEFAULT_DELAY_MS, &raw)?;
    }
    if let Some(filter) = non_empty_env(env_lookup, ENV_LOG) {
        config.log.filter = filter;
    }
    Ok(())
}

fn non_empty_env<FEnv>(env_lookup: &FEnv, name: &str) -> Option<String>
where
    FEnv: Fn(&str) -> Option<String>,
{
    env_lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_millis(name: &str, raw: &str) -> Result<u64, ConfigError> {
    raw.parse::<u64>().map_err(|_| {
        ConfigError::Invalid(format!(
            "invalid {name} value `{raw}`: expected non-negative integer milliseconds"
        ))
    })
}
