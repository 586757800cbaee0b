//! Database connection configuration.
//!
//! Connection settings live in the `[database]` table of a TOML file:
//!
//! ```toml
//! [database]
//! host = "localhost"
//! port = 5432
//! dbname = "detections"
//! user = "postgres"
//! password = "${PGPASSWORD}"
//! ```
//!
//! `${VAR}` placeholders are substituted from the environment before
//! parsing, then `YOLOPREP_DB_*` variables override individual keys
//! (`YOLOPREP_DB_HOST`, `YOLOPREP_DB_PORT`, `YOLOPREP_DB_NAME`,
//! `YOLOPREP_DB_USER`, `YOLOPREP_DB_PASSWORD`,
//! `YOLOPREP_DB_CONNECT_TIMEOUT`).

mod loader;

pub use loader::{apply_overrides_from, load_config, substitute_env_vars};

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::error::YoloPrepError;

/// Top-level configuration file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.database.validate()
    }
}

/// PostgreSQL connection parameters.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: Option<SecretString>,
    /// Connection timeout; 0 disables it.
    pub connect_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            dbname: "postgres".to_string(),
            user: "postgres".to_string(),
            password: None,
            connect_timeout_seconds: 10,
        }
    }
}

impl DatabaseConfig {
    fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("database.host cannot be empty".to_string());
        }
        if self.port == 0 {
            return Err("database.port must be greater than 0".to_string());
        }
        if self.dbname.trim().is_empty() {
            return Err("database.dbname cannot be empty".to_string());
        }
        if self.user.trim().is_empty() {
            return Err("database.user cannot be empty".to_string());
        }
        Ok(())
    }

    /// Build the client configuration used to open a connection.
    pub fn to_pg_config(&self) -> postgres::Config {
        let mut pg = postgres::Config::new();
        pg.host(&self.host)
            .port(self.port)
            .dbname(&self.dbname)
            .user(&self.user);

        if let Some(password) = &self.password {
            pg.password(password.expose_secret());
        }
        if self.connect_timeout_seconds > 0 {
            pg.connect_timeout(Duration::from_secs(self.connect_timeout_seconds));
        }

        pg
    }
}

/// Where the connection settings come from.
#[derive(Debug)]
pub enum ConnectionSettings {
    /// A libpq-style URL or key/value connection string.
    Url(SecretString),
    /// Discrete parameters from a config file and/or the environment.
    Params(DatabaseConfig),
}

impl ConnectionSettings {
    pub fn to_pg_config(&self) -> Result<postgres::Config, YoloPrepError> {
        match self {
            ConnectionSettings::Url(url) => url
                .expose_secret()
                .parse::<postgres::Config>()
                .map_err(|e| YoloPrepError::Config(format!("invalid database URL: {}", e))),
            ConnectionSettings::Params(config) => Ok(config.to_pg_config()),
        }
    }
}
