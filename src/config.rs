//! Application configuration
//!
//! Loaded from a TOML file (`~/.config/ebike-rental/config.toml` by default).
//! Every section is optional; missing values fall back to the defaults below.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::application::services::WriteMode;
use crate::infrastructure::database::DatabaseConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Default location of the config file
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ebike-rental")
        .join("config.toml")
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub logging: LoggingSettings,
    pub rental: RentalSettings,
    pub seed: SeedSettings,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Seconds allowed for in-flight requests after a shutdown signal
    pub shutdown_timeout: u64,
}

impl ServerSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseEngine {
    Postgres,
    Sqlite,
}

/// Connection parameters for the relational store
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub engine: DatabaseEngine,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Database name; for SQLite, the file path
    pub name: String,
    pub max_connections: u32,
    /// Run pending migrations on startup
    pub auto_migrate: bool,
}

impl DatabaseSettings {
    pub fn connection_url(&self) -> String {
        match self.engine {
            DatabaseEngine::Postgres => format!(
                "postgres://{}:{}@{}:{}/{}",
                self.username, self.password, self.host, self.port, self.name
            ),
            DatabaseEngine::Sqlite => format!("sqlite://{}?mode=rwc", self.name),
        }
    }

    /// `DATABASE_URL` wins over the computed URL when set.
    pub fn to_database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: std::env::var("DATABASE_URL").unwrap_or_else(|_| self.connection_url()),
            max_connections: self.max_connections,
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            engine: DatabaseEngine::Postgres,
            host: "localhost".to_string(),
            port: 5432,
            username: "postgres".to_string(),
            password: "password".to_string(),
            name: "postgres".to_string(),
            max_connections: 10,
            auto_migrate: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive, overridden by `RUST_LOG`
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RentalSettings {
    pub write_mode: WriteMode,
}

/// Demo data inserted on startup when the tables are empty
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeedSettings {
    pub users: Vec<String>,
    pub bikes: Vec<SeedBike>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedBike {
    pub name: String,
    pub latitude: String,
    pub longitude: String,
}
