//! Core ProcBind functionality
//!
//! This module contains the main ProcBind struct, which turns an `AppConfig`
//! into ready-to-use accessors over the PostgreSQL call capability.

use proc_access::{
    AccessSettings, Connector, DirectDataAccess, MapResolver, MappedDataAccess, NameResolver,
};
use sqlx::Connection;
use std::sync::Arc;

use crate::errors::ProcBindError;
use crate::postgres::PgConnector;
use config::AppConfig;

/// Main ProcBind coordinator holding the connection string, access settings
/// and the configured name resolver
#[derive(Clone)]
pub struct ProcBind {
    connection_string: Arc<str>,
    settings: AccessSettings,
    connector: Arc<dyn Connector>,
    resolver: Arc<dyn NameResolver>,
}

impl std::fmt::Debug for ProcBind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcBind")
            .field("settings", &self.settings)
            .finish()
    }
}

impl ProcBind {
    /// Create new ProcBind from configuration.
    /// Procedure names come from `[procedures]`: explicit names first, then the schema convention.
    pub fn new(config: &AppConfig) -> Self {
        Self {
            connection_string: Arc::from(config.database.connection_string()),
            settings: AccessSettings::from(&config.access),
            connector: Arc::new(PgConnector::new()),
            resolver: Arc::new(MapResolver::from_config(&config.procedures)),
        }
    }

    /// Load configuration (see `AppConfig::load`) and build from it
    pub fn from_env() -> Result<Self, ProcBindError> {
        let config = AppConfig::load()?;
        Ok(Self::new(&config))
    }

    /// Replace the configured name resolver
    pub fn with_resolver<R: NameResolver + 'static>(mut self, resolver: R) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    /// Replace the call capability, e.g. with an instrumented connector
    pub fn with_connector<C: Connector + 'static>(mut self, connector: C) -> Self {
        self.connector = Arc::new(connector);
        self
    }

    pub fn settings(&self) -> &AccessSettings {
        &self.settings
    }

    /// Accessor that resolves procedure names from operation tags
    pub fn mapped(&self) -> MappedDataAccess {
        MappedDataAccess::new(
            self.connector.clone(),
            self.connection_string.clone(),
            self.resolver.clone(),
        )
        .with_settings(self.settings.clone())
    }

    /// Accessor that takes literal procedure names
    pub fn direct(&self) -> DirectDataAccess {
        DirectDataAccess::new(self.connector.clone(), self.connection_string.clone())
            .with_settings(self.settings.clone())
    }

    /// Check database connection health
    pub async fn health_check(&self) -> Result<(), ProcBindError> {
        let mut conn = sqlx::PgConnection::connect(&self.connection_string).await?;
        sqlx::query("SELECT 1").fetch_one(&mut conn).await?;
        conn.close().await?;
        Ok(())
    }
}
