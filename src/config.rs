//! Configuration file support for audiobook-fetcher.
//!
//! This module provides functionality for loading and saving user preferences
//! from a TOML configuration file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;

/// User configuration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the scraper backend. The deployed variants differ only
    /// in this URL.
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Directory the archive is saved into
    #[serde(default = "default_download_dir")]
    pub download_dir: String,

    /// Replay the search state on selection instead of relying on a
    /// server-side session
    #[serde(default)]
    pub stateless: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn default_server_url() -> String {
    "https://ezaudiobooks.ddns.net".to_string()
}

fn default_download_dir() -> String {
    ".".to_string()
}

impl Config {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self {
            server_url: default_server_url(),
            download_dir: default_download_dir(),
            stateless: false,
        }
    }

    /// Get the path to the config file.
    ///
    /// Returns ~/.config/audiobook-fetcher/config.toml on Linux,
    /// or a platform-appropriate location on other systems.
    pub fn get_config_path() -> Result<PathBuf, io::Error> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, "Could not find config directory")
            })?
            .join("audiobook-fetcher");

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from disk.
    ///
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = Self::get_config_path()?;

        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let path = Self::get_config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Create a default config file if one doesn't exist.
    ///
    /// Returns the path to the config file.
    pub fn create_default_if_missing() -> Result<PathBuf, Box<dyn std::error::Error>> {
        let path = Self::get_config_path()?;

        if !path.exists() {
            let config = Self::new();
            config.save()?;
        }

        Ok(path)
    }
}
