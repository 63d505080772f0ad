//! Configuration management for gamelog
//!
//! The configuration is read once at start-up and handed to the `Logger`,
//! which keeps it immutable for the rest of the process.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::logging::ThemePreset;

/// Environment variable overriding `log_dir`
pub const ENV_LOG_DIR: &str = "GAMELOG_DIR";
/// Environment variable overriding `theme`
pub const ENV_THEME: &str = "GAMELOG_THEME";

/// Logger configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Persistent directory holding the log file (`~` is expanded)
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// Log file name; the backup gets a `.old` suffix
    #[serde(default = "default_file_name")]
    pub file_name: String,

    /// Footer colors: "dark" (default) or "light"
    #[serde(default)]
    pub theme: ThemePreset,
}

fn default_file_name() -> String {
    "GameLog".to_string()
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            file_name: default_file_name(),
            theme: ThemePreset::default(),
        }
    }
}

impl LoggerConfig {
    /// Default configuration writing into `log_dir`
    pub fn with_log_dir(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
            ..Self::default()
        }
    }

    /// Load from the default config file (or defaults), then apply
    /// environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&config_file_path())?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration from file, or return default if not found
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default config file
    pub fn save(&self) -> Result<()> {
        std::fs::create_dir_all(config_dir()).context("Failed to create config directory")?;
        self.save_to(&config_file_path())
    }

    /// Save configuration to a file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// Apply `GAMELOG_DIR` / `GAMELOG_THEME` style overrides from `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_LOG_DIR).filter(|d| !d.trim().is_empty()) {
            self.log_dir = PathBuf::from(dir);
        }

        if let Some(theme) = lookup(ENV_THEME) {
            self.theme = theme
                .parse::<ThemePreset>()
                .with_context(|| format!("Invalid {} value", ENV_THEME))?;
        }

        Ok(())
    }

    /// Log directory with `~` expanded
    pub fn resolved_log_dir(&self) -> PathBuf {
        let raw = self.log_dir.to_string_lossy();
        PathBuf::from(shellexpand::tilde(&raw).into_owned())
    }

    /// Path of the current log file
    pub fn log_file_path(&self) -> PathBuf {
        self.resolved_log_dir().join(&self.file_name)
    }
}

/// Default persistent directory for the log (platform data dir)
/// Falls back to ./.gamelog if the data directory cannot be determined
pub fn default_log_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("gamelog"))
        .unwrap_or_else(|| PathBuf::from(".gamelog"))
}

/// Get the base configuration directory
/// Falls back to ./.gamelog if the config directory cannot be determined
pub fn config_dir() -> PathBuf {
    try_config_dir().unwrap_or_else(|| {
        tracing::warn!("Could not determine config directory, using current directory");
        PathBuf::from(".gamelog")
    })
}

/// Try to get the base configuration directory
pub fn try_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("gamelog"))
}

/// Get the path to the config file
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Ensure the log directory exists
pub fn ensure_directories(config: &LoggerConfig) -> Result<()> {
    std::fs::create_dir_all(config.resolved_log_dir()).context("Failed to create log directory")?;
    Ok(())
}
