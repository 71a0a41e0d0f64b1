// src/infrastructure/config.rs
use crate::domain::DomainError;
use anyhow::{Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// TOML configuration for the notes client
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ApiConfig {
    /// Address the `/notes` resources live under, e.g. `https://host/api`
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path segment of the public share endpoint (`public` or `shared`)
    #[serde(default = "default_shared_path")]
    pub shared_path: String,
    /// Per-request timeout; unset means wait for the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

// Default value functions
fn default_base_url() -> String { "http://localhost:8081/api".to_string() }
fn default_shared_path() -> String { "public".to_string() }

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            shared_path: default_shared_path(),
            timeout_secs: None,
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let toml_string = toml::to_string_pretty(self)
            .context("Failed to serialize config to TOML")?;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        std::fs::write(path.as_ref(), toml_string)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Create default configuration file at path
    pub fn create_default(path: impl AsRef<Path>) -> Result<Self> {
        let config = Self::default();
        config.save(path)?;
        Ok(config)
    }

    /// `<config dir>/noteshare/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("noteshare").join("config.toml"))
    }

    /// Load an explicitly given file, else the default file if present, else defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            debug!(?path, "Loading config from provided path");
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => {
                debug!(?path, "Loading config from default location");
                Self::load(&path)
            }
            _ => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Replace the base URL when an override was given.
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url {
            self.api.base_url = url;
        }
        self
    }

    /// Parsed base URL; must be an absolute http(s) address.
    pub fn base_url(&self) -> Result<Url, DomainError> {
        let url = Url::parse(self.api.base_url.trim()).map_err(|e| {
            DomainError::Config(format!("invalid base URL '{}': {e}", self.api.base_url))
        })?;

        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(DomainError::Config(format!(
                "base URL must be an http(s) address: {}",
                self.api.base_url
            )));
        }
        Ok(url)
    }

    /// Share path without surrounding slashes.
    pub fn shared_path(&self) -> Result<&str, DomainError> {
        let path = self.api.shared_path.trim().trim_matches('/');
        if path.is_empty() {
            return Err(DomainError::Config(
                "shared_path must not be empty".to_string(),
            ));
        }
        Ok(path)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.api.timeout_secs.map(Duration::from_secs)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        self.base_url()?;
        self.shared_path()?;
        Ok(())
    }
}
