//! YAML configuration for the dashboard CLI.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::stage::{PromotionPolicy, Stage, StageTrack, Substage};
use crate::paths;

/// Environment variable overriding the config location.
pub const CONFIG_ENV_VAR: &str = "VENTURE_DASHBOARD_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub api: ApiConfig,
    /// The fixed incubation track. `order` fields define the flattened
    /// sequence; the track is never edited at runtime.
    #[serde(default = "default_track")]
    pub track: Vec<Stage>,
    #[serde(default)]
    pub promotion: PromotionPolicy,
    #[serde(default)]
    pub refresh: RefreshConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// Per-request deadline in seconds; exceeding it classifies as a timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Session cookie (`name=value`) attached to every request.
    #[serde(default)]
    pub session_cookie: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Seconds between refresh cycles in watch mode.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_interval_secs() -> u64 {
    60
}

/// The standard two-stage incubator track.
fn default_track() -> Vec<Stage> {
    vec![
        Stage {
            name: "Pre-Incubation".to_string(),
            order: 1,
            substages: vec![
                Substage { name: "Idea".to_string(), order: 1 },
                Substage { name: "Concept".to_string(), order: 2 },
                Substage { name: "Research".to_string(), order: 3 },
            ],
        },
        Stage {
            name: "Incubation".to_string(),
            order: 2,
            substages: vec![
                Substage { name: "BMC".to_string(), order: 1 },
                Substage { name: "Plan".to_string(), order: 2 },
                Substage { name: "Pitch".to_string(), order: 3 },
            ],
        },
    ]
}

impl DashboardConfig {
    /// Loads and validates a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid YAML, or
    /// fails validation.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            bail!("api.base_url must not be empty");
        }
        if self.api.timeout_secs == 0 {
            bail!("api.timeout_secs must be at least 1");
        }
        if self.track.is_empty() {
            bail!("track must define at least one stage");
        }
        for stage in &self.track {
            if stage.substages.is_empty() {
                bail!("stage '{}' must define at least one substage", stage.name);
            }
        }
        Ok(())
    }

    /// The configured track as an ordered, flattened-ready value.
    pub fn stage_track(&self) -> StageTrack {
        StageTrack::new(self.track.clone())
    }
}

/// Resolves the config path: explicit flag, then `VENTURE_DASHBOARD_CONFIG`,
/// then the default under the app home.
pub fn resolve_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        return Ok(PathBuf::from(path));
    }
    paths::default_config_path()
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod config_tests;
