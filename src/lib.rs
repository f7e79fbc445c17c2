//! # ProcBind
//!
//! A Rust data-access library for stored procedures. Model types derive their
//! field/column mapping at compile time; accessors bind models as procedure
//! parameters and materialize result rows back into models.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use procbind::prelude::*;
//!
//! #[derive(Debug, Clone, Record)]
//! #[record(rename_all = "snake_case")]
//! pub struct Customer {
//!     pub name: String,
//!     pub email: Option<String>,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let procbind = ProcBind::new(&config);
//!     procbind.health_check().await?;
//!
//!     let customers = procbind.mapped();
//!     let id: i64 = customers
//!         .insert(
//!             &Customer { name: "Ada".into(), email: None },
//!             OperationKind::Insert,
//!             CallOptions::new(),
//!         )
//!         .await?;
//!
//!     let customer: Option<Customer> = customers
//!         .get_object_by_id(id, OperationKind::GetObjectById, CallOptions::new())
//!         .await
//!         .optional()?;
//!     println!("Fetched: {:?}", customer);
//!
//!     Ok(())
//! }
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod core;
pub mod errors;
pub mod postgres;
pub mod prelude;

// Re-export the main public types for convenience
pub use self::core::ProcBind;
pub use errors::ProcBindError;
pub use postgres::PgConnector;

// Re-export centralized config
pub use config::{AccessConfig, AppConfig, DatabaseConfig, ProcedureConfig};

// Re-export internal crates used by macros and public API
// These MUST be public for the generated macro code to work correctly
pub use proc_access;
pub use record_derive;
pub use type_mapping;

// Re-export external dependencies used in public API
pub use async_trait;
pub use sqlx;
