//! config
//!
//! Client configuration loading.
//!
//! # Precedence
//!
//! Values are resolved in this order (later overrides earlier):
//! 1. Built-in defaults
//! 2. Config file
//! 3. Environment variables (`KEEPTAB_API_BASE`, `KEEPTAB_STORE`)
//!
//! # Config File Locations
//!
//! Searched in order:
//! 1. `$KEEPTAB_CONFIG` if set
//! 2. `$KEEPTAB_HOME/config.toml` if set
//! 3. `~/.keeptab/config.toml`
//!
//! A missing file is not an error; defaults apply.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::store::DEFAULT_PROVIDER;

/// Default API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.keeptab.app";

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("home directory not found")]
    NoHomeDir,
}

/// On-disk config schema. Every field is optional.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    /// API base URL.
    api_base: Option<String>,

    /// Credential store provider ("file", "keychain", "memory").
    store_provider: Option<String>,
}

/// Resolved client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL, without a trailing slash requirement.
    pub api_base: String,

    /// Credential store provider name.
    pub store_provider: String,
}

impl ClientConfig {
    /// Load configuration from the default locations and environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        let file = Self::read_file(&path)?;
        Ok(Self::resolve(
            file,
            env::var("KEEPTAB_API_BASE").ok(),
            env::var("KEEPTAB_STORE").ok(),
        ))
    }

    /// Configuration pointing at a specific API base with defaults for
    /// everything else. Useful for tests and embedders.
    pub fn with_api_base(base: impl Into<String>) -> Self {
        Self {
            api_base: base.into(),
            store_provider: DEFAULT_PROVIDER.to_string(),
        }
    }

    /// Apply precedence: defaults, then file, then environment.
    fn resolve(
        file: ConfigFile,
        env_api_base: Option<String>,
        env_store: Option<String>,
    ) -> Self {
        let api_base = env_api_base
            .filter(|v| !v.is_empty())
            .or(file.api_base)
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let store_provider = env_store
            .filter(|v| !v.is_empty())
            .or(file.store_provider)
            .unwrap_or_else(|| DEFAULT_PROVIDER.to_string());
        Self {
            api_base,
            store_provider,
        }
    }

    /// Determine the config file path.
    fn config_path() -> Result<PathBuf, ConfigError> {
        if let Some(path) = env::var_os("KEEPTAB_CONFIG") {
            return Ok(PathBuf::from(path));
        }
        if let Some(home) = env::var_os("KEEPTAB_HOME") {
            return Ok(PathBuf::from(home).join("config.toml"));
        }
        dirs::home_dir()
            .map(|home| home.join(".keeptab").join("config.toml"))
            .ok_or(ConfigError::NoHomeDir)
    }

    /// Read and parse the config file; a missing file yields defaults.
    fn read_file(path: &Path) -> Result<ConfigFile, ConfigError> {
        if !path.exists() {
            return Ok(ConfigFile::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::resolve(ConfigFile::default(), None, None)
    }
}
