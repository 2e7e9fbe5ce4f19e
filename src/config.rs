//! Client settings.
//!
//! A small JSON file under the user's home that pins the API base URL. The
//! effective environment is chosen as: `--api-url` flag, then this file, then
//! the `TOOLTRACK_ENVIRONMENT` variable, then the hosted default.

use crate::consts::cli_consts::{ENVIRONMENT_VAR, SETTINGS_DIR, SETTINGS_FILE};
use crate::environment::Environment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{fs, io};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine the home directory")]
    NoHomeDir,

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid settings file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid API URL `{0}`: expected an http:// or https:// URL")]
    InvalidUrl(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Overrides the API base URL of the selected environment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
}

/// Location of the settings file: `~/.tooltrack/settings.json`.
pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let home = home::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(SETTINGS_DIR).join(SETTINGS_FILE))
}

impl Config {
    pub fn new(api_base_url: Option<String>) -> Self {
        Config { api_base_url }
    }

    /// Loads settings from a JSON file at the given path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let buf = fs::read(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_slice(&buf).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads settings, treating a missing file as defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }
        Self::load_from_file(path)
    }

    /// Saves the settings to a JSON file at the given path.
    ///
    /// Directories will be created if they don't exist. This method overwrites existing files.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source: io::Error| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(io_err)
    }

    /// Deletes the settings file. A missing file is not an error.
    pub fn clear(path: &Path) -> Result<(), ConfigError> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

/// Parses a user-supplied base URL into a custom environment.
pub fn parse_api_url(url: &str) -> Result<Environment, ConfigError> {
    match url.parse::<Environment>() {
        Ok(env @ Environment::Custom { .. }) => Ok(env),
        _ => Err(ConfigError::InvalidUrl(url.to_string())),
    }
}

/// Picks the environment for this run.
pub fn resolve_environment(
    flag: Option<&str>,
    config: &Config,
    env_var: Option<&str>,
) -> Result<Environment, ConfigError> {
    if let Some(url) = flag {
        return parse_api_url(url);
    }
    if let Some(url) = config.api_base_url.as_deref() {
        return parse_api_url(url);
    }
    Ok(env_var
        .and_then(|value| match value.parse::<Environment>() {
            Ok(env) => Some(env),
            Err(()) => {
                log::warn!("Ignoring unknown {}={}", ENVIRONMENT_VAR, value);
                None
            }
        })
        .unwrap_or_default())
}
