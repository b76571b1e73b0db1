//! Tracing setup: append to a log file under the XDG state dir, or stderr.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_NAME: &str = "gfy.log";

const DEFAULT_FILTER: &str = "info,gfy=debug,gfy_core=debug";

/// `RUST_LOG` if set and valid, else [`DEFAULT_FILTER`].
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// `~/.local/state/gfy/gfy.log`, creating the directory.
pub fn default_log_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("gfy")?;
    Ok(xdg_dirs.place_state_file(LOG_FILE_NAME)?)
}

/// Installs the global subscriber writing to [`default_log_path`].
///
/// Returns the log path. Errors leave no subscriber installed, so the caller
/// can fall back to [`init_logging_stderr`].
pub fn init_logging() -> Result<PathBuf> {
    let path = default_log_path()?;
    init_logging_to(&path)?;
    Ok(path)
}

/// Installs the global subscriber appending to `path`.
pub fn init_logging_to(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install subscriber: {}", e))?;

    tracing::info!("gfy logging initialized at {}", path.display());
    Ok(())
}

/// Stderr-only logging; never fails, a second call is a no-op.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
