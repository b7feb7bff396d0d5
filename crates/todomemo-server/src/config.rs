//! Server configuration from environment variables.
//!
//! - `HOST`: bind address (default `0.0.0.0`)
//! - `PORT`: bind port (default `3000`)
//! - `TODOMEMO_DATA_FILE`: JSON file to persist todos to. Unset means in-memory only.
//!
//! `main` loads a `.env` file (if any) before calling [`ServerConfig::from_env`].

use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PORT='{0}' is not a valid port number")]
    InvalidPort(String),

    #[error("TODOMEMO_DATA_FILE must not be empty when set")]
    EmptyDataFile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_file: Option<PathBuf>,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            data_file: None,
        }
    }

    pub fn with_data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_file = Some(path.into());
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// `lookup` で環境変数を引く（テストでは HashMap などを渡す）
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("PORT").map(|value| value.trim().to_string()) {
            None => DEFAULT_PORT,
            Some(value) if value.is_empty() => DEFAULT_PORT,
            Some(value) => value
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(value))?,
        };

        let data_file = match lookup("TODOMEMO_DATA_FILE") {
            None => None,
            Some(value) if value.trim().is_empty() => return Err(ConfigError::EmptyDataFile),
            Some(value) => Some(PathBuf::from(value.trim())),
        };

        Ok(Self {
            host,
            port,
            data_file,
        })
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}
