//! Convenience re-exports for common ProcBind usage
//!
//! This prelude module re-exports the most commonly used items from the ProcBind workspace,
//! making it easier to import everything you need with a single use statement.
//!
//! # Example
//!
//! ```rust
//! use procbind::prelude::*;
//!
//! // Now you have access to the accessors, the Record derive and the call options
//! ```

// Core ProcBind components
pub use crate::core::ProcBind;
pub use crate::errors::ProcBindError;
pub use crate::postgres::PgConnector;

// Re-export centralized config
pub use config::{AccessConfig, AppConfig, DatabaseConfig, ProcedureConfig};

// Re-export commonly used proc-access types for convenience
pub use proc_access::prelude::*;

// Re-export proc_access module for derive-generated code
pub use proc_access;

// Common external dependencies
pub use anyhow;
pub use sqlx;
pub use tokio;
