//! Stock name resolvers
//!
//! `ConventionResolver` derives names from the operation and model type.
//! `MapResolver` looks names up in an explicit table, usually loaded from
//! the `[procedures]` section of the configuration file.

use crate::errors::ResolutionError;
use crate::traits::resolver::{NameResolver, OperationContext, OperationKind};
use config::ProcedureConfig;
use std::collections::HashMap;

/// Renders `{schema}.{Kind}{Type}`, or `{schema}.{Kind}{untyped_suffix}`
/// when the call has no type context.
#[derive(Debug, Clone)]
pub struct ConventionResolver {
    schema: String,
    untyped_suffix: String,
}

impl ConventionResolver {
    pub fn new(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            untyped_suffix: String::new(),
        }
    }

    pub fn with_untyped_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.untyped_suffix = suffix.into();
        self
    }

    pub fn from_config(config: &ProcedureConfig) -> Self {
        Self::new(config.schema.clone()).with_untyped_suffix(config.untyped_suffix.clone())
    }
}

impl NameResolver for ConventionResolver {
    fn resolve(&self, context: &OperationContext) -> Result<String, ResolutionError> {
        let subject = match context.type_context() {
            Some(descriptor) => descriptor.name(),
            None => self.untyped_suffix.as_str(),
        };
        Ok(format!("{}.{}{}", self.schema, context.kind(), subject))
    }
}

/// Looks a context up by `Kind:Type`, then by `Kind`, then falls back.
#[derive(Default)]
pub struct MapResolver {
    names: HashMap<String, String>,
    fallback: Option<Box<dyn NameResolver>>,
}

impl MapResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map every context rendering as `key` (`Kind` or `Kind:Type`)
    pub fn with_name(mut self, key: impl Into<String>, procedure: impl Into<String>) -> Self {
        self.names.insert(key.into(), procedure.into());
        self
    }

    /// Map one operation on one model type
    pub fn with_typed(self, kind: OperationKind, type_name: &str, procedure: impl Into<String>) -> Self {
        self.with_name(format!("{}:{}", kind, type_name), procedure)
    }

    /// Resolver consulted when no entry matches
    pub fn with_fallback<R: NameResolver + 'static>(mut self, fallback: R) -> Self {
        self.fallback = Some(Box::new(fallback));
        self
    }

    /// Explicit names from configuration, with the naming convention as fallback
    pub fn from_config(config: &ProcedureConfig) -> Self {
        let resolver = config
            .names
            .iter()
            .fold(Self::new(), |resolver, (key, procedure)| {
                resolver.with_name(key.clone(), procedure.clone())
            });
        resolver.with_fallback(ConventionResolver::from_config(config))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl std::fmt::Debug for MapResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapResolver")
            .field("names", &self.names)
            .field("has_fallback", &self.fallback.is_some())
            .finish()
    }
}

impl NameResolver for MapResolver {
    fn resolve(&self, context: &OperationContext) -> Result<String, ResolutionError> {
        if let Some(name) = self.names.get(&context.to_string()) {
            return Ok(name.clone());
        }
        if let Some(name) = self.names.get(context.kind().as_str()) {
            return Ok(name.clone());
        }
        match &self.fallback {
            Some(fallback) => fallback.resolve(context),
            None => Err(ResolutionError::Unmapped(context.to_string())),
        }
    }
}
