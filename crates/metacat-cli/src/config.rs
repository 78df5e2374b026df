//! Catalogue configuration.
//!
//! Resolution order, later wins:
//!
//! 1. built-in defaults
//! 2. the TOML file (`--config`, else `$XDG_CONFIG_HOME/metacat/config.toml`)
//! 3. `METACAT_*` environment variables
//!
//! A missing file is not an error; defaults and the environment still apply.

use std::path::{Path, PathBuf};

use metacat_api::ServerConfig;
use metacat_search::SearchConfig;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Project name used for the config directory and in messages.
pub const PROJECT_NAME: &str = "metacat";

/// Environment variable overriding the index URL.
pub const ENV_INDEX_URL: &str = "METACAT_INDEX_URL";
/// Environment variable overriding the index user.
pub const ENV_INDEX_USER: &str = "METACAT_INDEX_USER";
/// Environment variable overriding the index password.
pub const ENV_INDEX_PASSWORD: &str = "METACAT_INDEX_PASSWORD";
/// Environment variable overriding the database URL.
pub const ENV_DATABASE_URL: &str = "METACAT_DATABASE_URL";
/// Environment variable overriding the listen port.
pub const ENV_PORT: &str = "METACAT_PORT";

/// Relational store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite connection URL.
    #[serde(default = "default_database_url")]
    pub url: String,
}

fn default_database_url() -> String {
    "sqlite://metacat.db?mode=rwc".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

/// Full configuration of the `metacat` binary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogueConfig {
    /// HTTP listener.
    #[serde(default)]
    pub server: ServerConfig,

    /// Full-text index connection.
    #[serde(default)]
    pub index: SearchConfig,

    /// Relational store connection.
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl CatalogueConfig {
    /// Default config file location.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(PROJECT_NAME).join("config.toml"))
    }

    /// Explicit path if given, else the default location.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        match explicit {
            Some(path) => Some(PathBuf::from(path)),
            None => Self::default_config_path(),
        }
    }

    /// Load from file and the process environment.
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        Self::load_with_env(explicit, |key| std::env::var(key).ok())
    }

    /// Load from file, then apply overrides from `lookup`.
    pub fn load_with_env<F>(explicit: Option<&str>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match Self::resolve_config_path(explicit) {
            Some(path) if path.exists() => Self::from_file(&path)?,
            Some(path) if explicit.is_some() => {
                return Err(Error::config(format!(
                    "Config file not found at {}",
                    path.display()
                )));
            }
            _ => Self::default(),
        };
        config.apply_env(lookup)?;
        Ok(config)
    }

    /// Parse a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        toml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))
    }

    /// Apply `METACAT_*` overrides.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_INDEX_URL) {
            self.index.url = url;
        }
        if let Some(user) = lookup(ENV_INDEX_USER) {
            self.index.user = Some(user);
        }
        if let Some(password) = lookup(ENV_INDEX_PASSWORD) {
            self.index.password = Some(password);
        }
        if let Some(url) = lookup(ENV_DATABASE_URL) {
            self.database.url = url;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| Error::config(format!("{ENV_PORT} is not a valid port: '{port}'")))?;
        }
        Ok(())
    }

    /// Serialize as pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Copy with secrets masked, for display.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.index.password.is_some() {
            copy.index.password = Some("********".to_string());
        }
        copy
    }
}

// ============================================================================
// Tests
// ============================================================================
