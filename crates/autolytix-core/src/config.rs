//! Application configuration management.
//!
//! This module handles loading and saving the application configuration:
//! the backend environment, an optional API URL override, and the last
//! email used to log in.
//!
//! Configuration is stored at `~/.config/autolytix/config.json`; the session
//! storage file lives in the platform data directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application name used for config/data directory paths
const APP_NAME: &str = "autolytix";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Session storage file name
const STORAGE_FILE: &str = "storage.json";

/// Environment variable that overrides the configured API URL
pub const API_URL_ENV: &str = "AUTOLYTIX_API_URL";

/// Backend the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Deployed backend. Its URL is site-specific and must be configured.
    Production,
    /// Local development backend.
    #[default]
    Staging,
}

impl Environment {
    pub fn default_api_url(&self) -> Option<&'static str> {
        match self {
            Environment::Production => None,
            Environment::Staging => Some("http://localhost:8080"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub environment: Environment,
    pub api_url: Option<String>,
    pub last_email: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Where the session token and user are persisted.
    pub fn storage_path(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME).join(STORAGE_FILE))
    }

    /// Backend base URL: `AUTOLYTIX_API_URL`, then `api_url`, then the
    /// environment default.
    pub fn api_base_url(&self) -> Result<String> {
        self.resolve_api_url(std::env::var(API_URL_ENV).ok())
    }

    fn resolve_api_url(&self, env_override: Option<String>) -> Result<String> {
        env_override
            .into_iter()
            .chain(self.api_url.clone())
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .find(|url| !url.is_empty())
            .or_else(|| self.environment.default_api_url().map(str::to_string))
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No API URL configured for {:?}; set api_url in the config or {}",
                    self.environment,
                    API_URL_ENV
                )
            })
    }
}
