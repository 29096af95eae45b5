//! TUI configuration management.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use switchboard_core::DEFAULT_BASE_URL;

/// TUI configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TuiConfig {
    /// Backend API configuration
    #[serde(default)]
    pub api: ApiConfig,
    /// Interface configuration
    #[serde(default)]
    pub ui: UiConfig,
}

/// Backend API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the agent platform API (default: http://localhost:8000/api/v1)
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Interface configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Event poll interval in milliseconds (default: 100)
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
    /// Maximum chat messages rendered on screen (default: 500)
    #[serde(default = "default_max_messages")]
    pub max_messages: usize,
}

fn default_tick_rate_ms() -> u64 {
    100
}

fn default_max_messages() -> usize {
    500
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 100,
            max_messages: 500,
        }
    }
}

impl TuiConfig {
    /// Get the config file path.
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
        Ok(home.join(".switchboard").join("config.toml"))
    }

    /// Load configuration from the default location, generating a
    /// commented default file on first run.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save_to(&config_path)?;
            return Ok(default_config);
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to a specific file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        // Generate TOML with comments
        let mut toml = String::new();
        toml.push_str("# Switchboard TUI Configuration\n\n");
        toml.push_str("[api]\n");
        toml.push_str("# Base URL of the agent platform API\n");
        toml.push_str(&format!("base_url = \"{}\"\n\n", self.api.base_url));

        toml.push_str("[ui]\n");
        toml.push_str("# Event poll interval in milliseconds (default: 100)\n");
        toml.push_str(&format!("tick_rate_ms = {}\n", self.ui.tick_rate_ms));
        toml.push_str("# Maximum chat messages rendered on screen (default: 500)\n");
        toml.push_str(&format!("max_messages = {}\n", self.ui.max_messages));

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = TuiConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:8000/api/v1");
        assert_eq!(config.ui.tick_rate_ms, 100);
        assert_eq!(config.ui.max_messages, 500);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = TuiConfig::default();
        config.api.base_url = "http://agents.internal:9000/api/v1".to_string();
        config.ui.tick_rate_ms = 50;
        config.save_to(&path).unwrap();

        let loaded = TuiConfig::load_from(&path).unwrap();
        assert_eq!(loaded.api.base_url, "http://agents.internal:9000/api/v1");
        assert_eq!(loaded.ui.tick_rate_ms, 50);
        assert_eq!(loaded.ui.max_messages, 500);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[api]\nbase_url = \"http://other:8000/api/v1\"\n").unwrap();

        let loaded = TuiConfig::load_from(&path).unwrap();
        assert_eq!(loaded.api.base_url, "http://other:8000/api/v1");
        assert_eq!(loaded.ui.tick_rate_ms, 100);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[api\nbase_url = 12").unwrap();

        assert!(TuiConfig::load_from(&path).is_err());
    }
}
