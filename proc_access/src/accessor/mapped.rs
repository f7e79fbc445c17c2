use super::core::{AccessSettings, CallEngine};
use crate::errors::{DataAccessError, ResolutionError};
use crate::id_type::Identifier;
use crate::marshal::{bind_inputs, render_input_key};
use crate::options::CallOptions;
use crate::traits::access::DataAccess;
use crate::traits::connection::Connector;
use crate::traits::record::{ProcInput, Record};
use crate::traits::resolver::{NameResolver, OperationContext, OperationKind};
use crate::validation::ProcedureName;
use async_trait::async_trait;
use std::sync::Arc;

/// Accessor that asks a `NameResolver` for every procedure name.
///
/// Operations centered on a model type (get, list, insert, update) pass the
/// type to the resolver; the rest pass only the operation tag.
#[derive(Clone)]
pub struct MappedDataAccess {
    engine: CallEngine,
    resolver: Arc<dyn NameResolver>,
}

impl std::fmt::Debug for MappedDataAccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappedDataAccess")
            .field("engine", &self.engine)
            .finish()
    }
}

impl MappedDataAccess {
    pub fn new(
        connector: Arc<dyn Connector>,
        connection_string: impl Into<Arc<str>>,
        resolver: Arc<dyn NameResolver>,
    ) -> Self {
        Self {
            engine: CallEngine::new(connector, connection_string.into(), AccessSettings::default()),
            resolver,
        }
    }

    pub fn with_settings(mut self, settings: AccessSettings) -> Self {
        self.engine = self.engine.with_settings(settings);
        self
    }

    pub fn settings(&self) -> &AccessSettings {
        self.engine.settings()
    }

    /// Resolve and validate the procedure name for `context`.
    /// Resolver failures are returned unchanged.
    pub fn resolve(&self, context: OperationContext) -> Result<ProcedureName, DataAccessError> {
        let name = self.resolver.resolve(&context)?;
        if name.is_empty() {
            return Err(ResolutionError::Empty(context.to_string()).into());
        }
        let procedure = ProcedureName::new(&name).map_err(ResolutionError::InvalidName)?;
        trace_log!("[RESOLVE] {} -> {}", context, procedure);
        Ok(procedure)
    }

    fn resolve_typed<T: Record>(&self, kind: OperationKind) -> Result<ProcedureName, DataAccessError> {
        self.resolve(OperationContext::typed::<T>(kind))
    }
}

#[async_trait]
impl DataAccess for MappedDataAccess {
    type Target = OperationKind;

    async fn get_object_by_id<TID, T>(
        &self,
        id: TID,
        target: OperationKind,
        options: CallOptions,
    ) -> Result<T, DataAccessError>
    where
        TID: Identifier,
        T: Record,
    {
        let procedure = self.resolve_typed::<T>(target)?;
        let key = id.to_string();
        let parameters = vec![self.engine.id_input(id)];
        self.engine
            .fetch_one(&procedure, parameters, move || key, options)
            .await
    }

    async fn get_object_with_parameters<P, T>(
        &self,
        input: &P,
        target: OperationKind,
        options: CallOptions,
    ) -> Result<T, DataAccessError>
    where
        P: ProcInput + Sync + ?Sized,
        T: Record,
    {
        let procedure = self.resolve_typed::<T>(target)?;
        let parameters = bind_inputs(input, self.engine.prefix());
        self.engine
            .fetch_one(&procedure, parameters, || render_input_key(input), options)
            .await
    }

    async fn get_list<T>(&self, target: OperationKind, options: CallOptions) -> Result<Vec<T>, DataAccessError>
    where
        T: Record,
    {
        let procedure = self.resolve_typed::<T>(target)?;
        self.engine.fetch_all(&procedure, Vec::new(), options).await
    }

    async fn get_list_with_parameters<P, T>(
        &self,
        input: &P,
        target: OperationKind,
        options: CallOptions,
    ) -> Result<Vec<T>, DataAccessError>
    where
        P: ProcInput + Sync + ?Sized,
        T: Record,
    {
        let procedure = self.resolve_typed::<T>(target)?;
        let parameters = bind_inputs(input, self.engine.prefix());
        self.engine.fetch_all(&procedure, parameters, options).await
    }

    async fn insert<TID, T>(&self, record: &T, target: OperationKind, options: CallOptions) -> Result<TID, DataAccessError>
    where
        TID: Identifier,
        T: Record,
    {
        let procedure = self.resolve_typed::<T>(target)?;
        let parameters = bind_inputs(record, self.engine.prefix());
        self.engine.execute_for_id::<TID>(&procedure, parameters, options).await
    }

    async fn update_by_id<TID, T>(
        &self,
        id: TID,
        record: &T,
        target: OperationKind,
        options: CallOptions,
    ) -> Result<(), DataAccessError>
    where
        TID: Identifier,
        T: Record,
    {
        let procedure = self.resolve_typed::<T>(target)?;
        let mut parameters = bind_inputs(record, self.engine.prefix());
        parameters.push(self.engine.id_input(id));
        self.engine.execute(&procedure, parameters, options).await
    }

    async fn id_call<TID>(&self, id: TID, target: OperationKind, options: CallOptions) -> Result<(), DataAccessError>
    where
        TID: Identifier,
    {
        let procedure = self.resolve(OperationContext::Tag(target))?;
        let parameters = vec![self.engine.id_input(id)];
        self.engine.execute(&procedure, parameters, options).await
    }

    async fn id_call_for<TID, T>(&self, id: TID, target: OperationKind, options: CallOptions) -> Result<(), DataAccessError>
    where
        TID: Identifier,
        T: Record,
    {
        let procedure = self.resolve_typed::<T>(target)?;
        let parameters = vec![self.engine.id_input(id)];
        self.engine.execute(&procedure, parameters, options).await
    }

    async fn parameter_call<P>(&self, input: &P, target: OperationKind, options: CallOptions) -> Result<(), DataAccessError>
    where
        P: ProcInput + Sync + ?Sized,
    {
        let procedure = self.resolve(OperationContext::Tag(target))?;
        let parameters = bind_inputs(input, self.engine.prefix());
        self.engine.execute(&procedure, parameters, options).await
    }

    async fn no_parameter_call(&self, target: OperationKind, options: CallOptions) -> Result<(), DataAccessError> {
        let procedure = self.resolve(OperationContext::Tag(target))?;
        self.engine.execute(&procedure, Vec::new(), options).await
    }
}
