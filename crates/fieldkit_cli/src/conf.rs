//! CLI constants and directory resolution.

use std::path::PathBuf;

use anyhow::{Context, Result};

/// Directory name under the platform data directory.
pub const C_APP_NAME: &str = "fieldkit";
/// Environment override for the preset directory.
pub const C_ENV_HISTORY_DIR: &str = "FIELDKIT_HISTORY_DIR";
/// Exported workbooks land here unless `--out-dir` is given.
pub const C_OUT_DIR_DEFAULT: &str = ".";

/// Preset directory: explicit value, else `<data_local_dir>/fieldkit`.
///
/// - Linux: `~/.local/share/fieldkit`
/// - macOS: `~/Library/Application Support/fieldkit`
/// - Windows: `%LOCALAPPDATA%\fieldkit`
pub fn resolve_history_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path_dir) = explicit {
        return Ok(path_dir);
    }
    dirs::data_local_dir()
        .map(|path| path.join(C_APP_NAME))
        .context("Could not determine the local data directory; pass --history-dir")
}

/// Output directory, defaulting to the working directory.
pub fn resolve_out_dir(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| PathBuf::from(C_OUT_DIR_DEFAULT))
}
