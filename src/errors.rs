//! Error types for the ProcBind crate
//!
//! Call failures are `proc_access::DataAccessError`; this module only covers
//! setting up the coordinator.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcBindError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Database connection error: {0}")]
    DatabaseConnection(#[from] sqlx::Error),
}
