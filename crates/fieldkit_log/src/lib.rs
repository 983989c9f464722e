//! `fieldkit_log` v1:
//! Process-wide `tracing` subscriber setup shared by fieldkit binaries.

use std::env;

use anyhow::anyhow;
use tracing_subscriber::EnvFilter;

/// Environment variable consulted when no explicit level is given.
pub const C_ENV_LOG_LEVEL: &str = "FIELDKIT_LOG";
/// Level used when neither an explicit level nor the env var is set.
pub const C_LOG_LEVEL_DEFAULT: &str = "warn";

/// Resolve the filter directive: explicit level, then env var, then default.
pub fn resolve_log_level(level: Option<&str>) -> String {
    level
        .map(str::to_string)
        .or_else(|| env::var(C_ENV_LOG_LEVEL).ok())
        .filter(|c_level| !c_level.trim().is_empty())
        .unwrap_or_else(|| C_LOG_LEVEL_DEFAULT.to_string())
}

/// Install a stderr `fmt` subscriber filtered by `level` (an `EnvFilter` directive).
///
/// `"off"` installs nothing. An unparsable directive falls back to `warn`.
pub fn init_logger(level: Option<&str>) -> anyhow::Result<()> {
    let c_level = resolve_log_level(level);
    if c_level.eq_ignore_ascii_case("off") {
        return Ok(());
    }

    let env_filter =
        EnvFilter::try_new(&c_level).unwrap_or_else(|_| EnvFilter::new(C_LOG_LEVEL_DEFAULT));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow!("Failed to set global tracing subscriber: {err}"))?;

    tracing::debug!(level = %c_level, "logger initialized");
    Ok(())
}
