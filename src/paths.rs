//! Home-based storage paths.
//!
//! Everything lives under `~/.venture-dashboard/`: `config.yaml` plus a
//! `logs/` directory for the JSONL cycle log.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

const APP_DIR: &str = ".venture-dashboard";

/// Returns `~/.venture-dashboard/`, creating it if needed.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined or the
/// directory cannot be created.
pub fn app_home_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    let dir = home.join(APP_DIR);
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create app directory: {}", dir.display()))?;
    Ok(dir)
}

/// Returns the default config path: `~/.venture-dashboard/config.yaml`.
pub fn default_config_path() -> Result<PathBuf> {
    Ok(app_home_dir()?.join("config.yaml"))
}

/// Returns the logs directory, creating it if needed.
pub fn logs_dir() -> Result<PathBuf> {
    let dir = app_home_dir()?.join("logs");
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create logs directory: {}", dir.display()))?;
    Ok(dir)
}
