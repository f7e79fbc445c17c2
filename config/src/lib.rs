//! # Configuration Management for procbind
//!
//! This crate provides centralized configuration structures for all procbind components:
//! the database connection, parameter binding conventions, and procedure naming.
//!
//! ## Quick Start
//!
//! ### Programmatic Configuration
//! ```rust
//! use config::{AccessConfig, DatabaseConfig, ProcedureConfig};
//!
//! let db_config = DatabaseConfig::new(
//!     "localhost".to_string(), 5432, "data_access_test".to_string(),
//!     "postgres".to_string(), "password".to_string(), 30,
//! );
//!
//! let access = AccessConfig::new("p_".to_string(), "id".to_string(), 15);
//! let procedures = ProcedureConfig::new("test".to_string(), "Test".to_string());
//! ```
//!
//! ### TOML File Configuration
//! ```toml
//! [database]
//! host = "localhost"
//! port = 5432
//! database = "data_access_test"
//! username = "postgres"
//! password = "password"
//! connection_timeout_seconds = 30
//!
//! [access]
//! parameter_prefix = "p_"
//! id_parameter = "id"
//! command_timeout_seconds = 15
//!
//! [procedures]
//! schema = "test"
//! untyped_suffix = "Test"
//!
//! [procedures.names]
//! "GetList:Test" = "test.list_all_tests"
//! NoParameterCall = "test.reset"
//! ```
//!
//! Load configuration:
//! ```rust,no_run
//! use config::AppConfig;
//!
//! // Load from procbind.toml (or the file named by PROCBIND_CONFIG)
//! let config = AppConfig::load()?;
//!
//! // Or load from custom path
//! let config = AppConfig::from_file("config/production.toml")?;
//! # Ok::<(), config::ConfigError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{env, path::Path};
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "./procbind.toml";
const CONFIG_PATH_ENV: &str = "PROCBIND_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Environment variable error: {0}")]
    Env(#[from] env::VarError),
    #[error("Dotenvy error: {0}")]
    Dotenvy(#[from] dotenvy::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub access: AccessConfig,
    #[serde(default)]
    pub procedures: ProcedureConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    pub connection_timeout_seconds: u64,
}

/// Parameter binding conventions shared by every accessor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AccessConfig {
    /// Prepended to every field name to form a parameter name
    pub parameter_prefix: String,
    /// Name (without prefix) of the identifier parameter
    pub id_parameter: String,
    /// Default per-call timeout; 0 disables it
    pub command_timeout_seconds: u64,
}

/// Procedure naming used by the configured name resolver
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProcedureConfig {
    /// Schema that conventional names are qualified with
    pub schema: String,
    /// Appended to conventional names when a call carries no type context
    pub untyped_suffix: String,
    /// Explicit names keyed by `Operation` or `Operation:Type`
    pub names: BTreeMap<String, String>,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            parameter_prefix: "@".to_string(),
            id_parameter: "Id".to_string(),
            command_timeout_seconds: 0,
        }
    }
}

impl Default for ProcedureConfig {
    fn default() -> Self {
        Self {
            schema: "dbo".to_string(),
            untyped_suffix: String::new(),
            names: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the TOML file named in .env or the default path
    pub fn load() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            // A missing .env file is fine, a malformed one is not
            if !e.not_found() {
                return Err(e.into());
            }
        }

        let config = if let Ok(config_path) = env::var(CONFIG_PATH_ENV) {
            Self::from_file(&config_path)
        } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
            Self::from_file(DEFAULT_CONFIG_PATH)
        } else {
            Err(ConfigError::Invalid(format!(
                "Config path must be specified in .env file as {} or in {} file",
                CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH
            )))
        }?;

        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<(), ConfigError> {
        // Database validations
        if self.database.host.is_empty() {
            return Err(ConfigError::Invalid(
                "Database host cannot be empty".to_string(),
            ));
        }
        if self.database.port == 0 {
            return Err(ConfigError::Invalid(
                "Database port cannot be zero".to_string(),
            ));
        }
        if self.database.database.is_empty() {
            return Err(ConfigError::Invalid(
                "Database name cannot be empty".to_string(),
            ));
        }
        if self.database.username.is_empty() {
            return Err(ConfigError::Invalid(
                "Database username cannot be empty".to_string(),
            ));
        }
        if self.database.connection_timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "Database connection_timeout_seconds must be greater than 0".to_string(),
            ));
        }

        // Access validations
        if self
            .access
            .parameter_prefix
            .chars()
            .any(|c| c.is_whitespace() || c == '"' || c == '\'')
        {
            return Err(ConfigError::Invalid(
                "Access parameter_prefix cannot contain whitespace or quotes".to_string(),
            ));
        }
        if self.access.id_parameter.is_empty() {
            return Err(ConfigError::Invalid(
                "Access id_parameter cannot be empty".to_string(),
            ));
        }

        // Procedure validations
        if self.procedures.schema.is_empty() {
            return Err(ConfigError::Invalid(
                "Procedure schema cannot be empty".to_string(),
            ));
        }
        if let Some((key, _)) = self.procedures.names.iter().find(|(_, name)| name.is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "Procedure name for '{}' cannot be empty",
                key
            )));
        }

        Ok(())
    }
}

impl AccessConfig {
    /// Create a new access configuration
    pub fn new(parameter_prefix: String, id_parameter: String, command_timeout_seconds: u64) -> Self {
        Self {
            parameter_prefix,
            id_parameter,
            command_timeout_seconds,
        }
    }
}

impl ProcedureConfig {
    /// Create a new procedure naming configuration with no explicit names
    pub fn new(schema: String, untyped_suffix: String) -> Self {
        Self {
            schema,
            untyped_suffix,
            names: BTreeMap::new(),
        }
    }

    /// Add an explicit name for an `Operation` or `Operation:Type` key
    pub fn with_name(mut self, key: impl Into<String>, procedure: impl Into<String>) -> Self {
        self.names.insert(key.into(), procedure.into());
        self
    }
}

impl DatabaseConfig {
    /// Create a new database configuration
    pub fn new(
        host: String,
        port: u16,
        database: String,
        username: String,
        password: String,
        connection_timeout_seconds: u64,
    ) -> Self {
        Self {
            host,
            port,
            database,
            username,
            password,
            connection_timeout_seconds,
        }
    }

    /// Build connection string
    pub fn connection_string(&self) -> String {
        format!(
            "postgresql://{}:{}@{}:{}/{}?connect_timeout={}",
            self.username,
            self.password,
            self.host,
            self.port,
            self.database,
            self.connection_timeout_seconds
        )
    }
}
