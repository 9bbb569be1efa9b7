//! File based configuration for the connection string and the server binary

use serde::Deserialize;
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File looked up in the working directory when nothing else is specified.
pub const DEFAULT_CONFIG_FILE: &str = "query-to-json.toml";

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_VAR: &str = "QUERY_TO_JSON_CONFIG";

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Config {
    /// Connection string handed to the driver, scheme picks the backend.
    pub connection_string: String,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> ServerConfig {
        ServerConfig {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ConfigError::NotFound(path.to_path_buf()))
            }
            Err(e) => return Err(ConfigError::IOError(e)),
        };

        let config = toml::from_str(&contents)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Resolve the config file location, the environment variable wins over
    /// the working directory default.
    pub fn resolve() -> Result<Config, ConfigError> {
        match env::var(CONFIG_PATH_VAR) {
            Ok(path) => Config::from_file(path),
            Err(_) => Config::from_file(DEFAULT_CONFIG_FILE),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file {} does not exist", .0.display())]
    NotFound(PathBuf),
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    #[error(transparent)]
    ParseError(#[from] toml::de::Error),
}
