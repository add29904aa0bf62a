//! Configuration management for Fyvio
//!
//! Handles config file loading/saving and backend URL resolution.
//! Config is stored at ~/.config/fyvio/config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Backend used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Environment variable overriding the configured backend
pub const BASE_URL_ENV: &str = "FYVIO_API_BASE";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Fyvio backend base URL
    pub base_url: Option<String>,
    /// Season shown when a series is opened
    pub default_season: Option<u32>,
}

impl Config {
    /// Get config file path (~/.config/fyvio/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("fyvio").join("config.toml"))
    }

    /// Load config from the default path, or return default if not found
    pub fn load() -> Self {
        match Self::path() {
            Some(path) if path.exists() => Self::load_from(&path).unwrap_or_else(|e| {
                tracing::warn!("ignoring unreadable config: {:#}", e);
                Self::default()
            }),
            _ => Self::default(),
        }
    }

    /// Load config from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::path().ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;
        self.save_to(&path)
    }

    /// Save config to an explicit file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// Resolve the backend URL with fallback chain:
    /// 1. Explicit override (CLI flag)
    /// 2. Environment variable FYVIO_API_BASE
    /// 3. Config file
    /// 4. DEFAULT_BASE_URL
    pub fn base_url(&self, cli_override: Option<&str>) -> String {
        let env = std::env::var(BASE_URL_ENV).ok();
        self.resolve_base_url(cli_override, env.as_deref())
    }

    fn resolve_base_url(&self, cli_override: Option<&str>, env: Option<&str>) -> String {
        let usable = |u: &&str| !u.trim().is_empty();
        let url = cli_override
            .filter(usable)
            .or(env.filter(usable))
            .or(self.base_url.as_deref().filter(usable))
            .unwrap_or(DEFAULT_BASE_URL);
        url.trim().trim_end_matches('/').to_string()
    }

    /// Season to open with, unless the caller asked for one
    pub fn season(&self, requested: Option<u32>) -> u32 {
        requested
            .or(self.default_season)
            .unwrap_or(crate::app::DEFAULT_SEASON)
    }
}
