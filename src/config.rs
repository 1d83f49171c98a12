use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Directory name used under the platform config directory
pub const APP_DIR_NAME: &str = "wizard-app";

const MIN_REFRESH_INTERVAL_MS: u64 = 10;
const MAX_REFRESH_INTERVAL_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    /// How often step titles are re-rendered, in milliseconds
    pub refresh_interval_ms: u64,

    /// Run the background refresh that animates running steps
    pub animate: bool,

    /// Tracing filter used when RUST_LOG is not set
    pub log_filter: String,

    /// Log directory (defaults to `<config dir>/wizard-app/logs`)
    pub log_dir: Option<PathBuf>,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: 100,
            animate: true,
            log_filter: "info".to_string(),
            log_dir: None,
        }
    }
}

impl WizardConfig {
    /// Refresh cadence as a duration
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_REFRESH_INTERVAL_MS..=MAX_REFRESH_INTERVAL_MS).contains(&self.refresh_interval_ms)
        {
            return Err(ConfigError::Invalid(format!(
                "refresh_interval_ms must be {}-{}ms, got {}",
                MIN_REFRESH_INTERVAL_MS, MAX_REFRESH_INTERVAL_MS, self.refresh_interval_ms
            )));
        }
        if self.log_filter.trim().is_empty() {
            return Err(ConfigError::Invalid("log_filter must not be empty".to_string()));
        }
        Ok(())
    }

    /// Get config file path
    pub fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join("config.json"))
    }

    /// Log directory to use, falling back to `logs` in the working directory
    pub fn resolved_log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| {
            dirs::config_dir()
                .map(|dir| dir.join(APP_DIR_NAME).join("logs"))
                .unwrap_or_else(|| PathBuf::from("logs"))
        })
    }

    /// Load configuration from a file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let load_failed = |source: Box<dyn std::error::Error + Send + Sync>| {
            ConfigError::LoadFailed {
                path: path.display().to_string(),
                source,
            }
        };

        let content = fs::read_to_string(path).map_err(|e| load_failed(e.into()))?;
        let config: WizardConfig =
            serde_json::from_str(&content).map_err(|e| load_failed(e.into()))?;
        config.validate()?;

        tracing::info!("Loaded config from: {}", path.display());
        Ok(config)
    }

    /// Save configuration to a file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::DirectoryCreationFailed {
                path: parent.display().to_string(),
                source,
            })?;
        }

        let save_failed = |source: Box<dyn std::error::Error + Send + Sync>| {
            ConfigError::SaveFailed {
                path: path.display().to_string(),
                source,
            }
        };

        let json = serde_json::to_string_pretty(self).map_err(|e| save_failed(e.into()))?;
        fs::write(path, json).map_err(|e| save_failed(e.into()))?;

        tracing::debug!("Saved config to: {}", path.display());
        Ok(())
    }

    /// Load configuration from the platform config directory
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_file_path().ok_or(ConfigError::NoConfigDir)?;
        Self::load_from(&path)
    }

    /// Save configuration to the platform config directory
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_file_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }
}
