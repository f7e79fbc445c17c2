use super::core::{AccessSettings, CallEngine};
use crate::errors::DataAccessError;
use crate::id_type::Identifier;
use crate::marshal::{bind_inputs, render_input_key};
use crate::options::CallOptions;
use crate::traits::access::DataAccess;
use crate::traits::connection::Connector;
use crate::traits::record::{ProcInput, Record};
use crate::validation::ProcedureName;
use async_trait::async_trait;
use std::borrow::Cow;
use std::sync::Arc;

/// Accessor whose caller names every procedure directly.
///
/// An invalid name fails with `DataAccessError::Argument` before a connection
/// is opened.
#[derive(Clone)]
pub struct DirectDataAccess {
    engine: CallEngine,
}

impl std::fmt::Debug for DirectDataAccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectDataAccess")
            .field("engine", &self.engine)
            .finish()
    }
}

impl DirectDataAccess {
    pub fn new(connector: Arc<dyn Connector>, connection_string: impl Into<Arc<str>>) -> Self {
        Self {
            engine: CallEngine::new(connector, connection_string.into(), AccessSettings::default()),
        }
    }

    pub fn with_settings(mut self, settings: AccessSettings) -> Self {
        self.engine = self.engine.with_settings(settings);
        self
    }

    pub fn settings(&self) -> &AccessSettings {
        self.engine.settings()
    }

    fn procedure(name: &str) -> Result<ProcedureName, DataAccessError> {
        Ok(ProcedureName::new(name)?)
    }
}

#[async_trait]
impl DataAccess for DirectDataAccess {
    type Target = Cow<'static, str>;

    async fn get_object_by_id<TID, T>(
        &self,
        id: TID,
        target: Cow<'static, str>,
        options: CallOptions,
    ) -> Result<T, DataAccessError>
    where
        TID: Identifier,
        T: Record,
    {
        let procedure = Self::procedure(&target)?;
        let key = id.to_string();
        let parameters = vec![self.engine.id_input(id)];
        self.engine
            .fetch_one(&procedure, parameters, move || key, options)
            .await
    }

    async fn get_object_with_parameters<P, T>(
        &self,
        input: &P,
        target: Cow<'static, str>,
        options: CallOptions,
    ) -> Result<T, DataAccessError>
    where
        P: ProcInput + Sync + ?Sized,
        T: Record,
    {
        let procedure = Self::procedure(&target)?;
        let parameters = bind_inputs(input, self.engine.prefix());
        self.engine
            .fetch_one(&procedure, parameters, || render_input_key(input), options)
            .await
    }

    async fn get_list<T>(&self, target: Cow<'static, str>, options: CallOptions) -> Result<Vec<T>, DataAccessError>
    where
        T: Record,
    {
        let procedure = Self::procedure(&target)?;
        self.engine.fetch_all(&procedure, Vec::new(), options).await
    }

    async fn get_list_with_parameters<P, T>(
        &self,
        input: &P,
        target: Cow<'static, str>,
        options: CallOptions,
    ) -> Result<Vec<T>, DataAccessError>
    where
        P: ProcInput + Sync + ?Sized,
        T: Record,
    {
        let procedure = Self::procedure(&target)?;
        let parameters = bind_inputs(input, self.engine.prefix());
        self.engine.fetch_all(&procedure, parameters, options).await
    }

    async fn insert<TID, T>(
        &self,
        record: &T,
        target: Cow<'static, str>,
        options: CallOptions,
    ) -> Result<TID, DataAccessError>
    where
        TID: Identifier,
        T: Record,
    {
        let procedure = Self::procedure(&target)?;
        let parameters = bind_inputs(record, self.engine.prefix());
        self.engine.execute_for_id::<TID>(&procedure, parameters, options).await
    }

    async fn update_by_id<TID, T>(
        &self,
        id: TID,
        record: &T,
        target: Cow<'static, str>,
        options: CallOptions,
    ) -> Result<(), DataAccessError>
    where
        TID: Identifier,
        T: Record,
    {
        let procedure = Self::procedure(&target)?;
        let mut parameters = bind_inputs(record, self.engine.prefix());
        parameters.push(self.engine.id_input(id));
        self.engine.execute(&procedure, parameters, options).await
    }

    async fn id_call<TID>(&self, id: TID, target: Cow<'static, str>, options: CallOptions) -> Result<(), DataAccessError>
    where
        TID: Identifier,
    {
        let procedure = Self::procedure(&target)?;
        let parameters = vec![self.engine.id_input(id)];
        self.engine.execute(&procedure, parameters, options).await
    }

    async fn id_call_for<TID, T>(
        &self,
        id: TID,
        target: Cow<'static, str>,
        options: CallOptions,
    ) -> Result<(), DataAccessError>
    where
        TID: Identifier,
        T: Record,
    {
        self.id_call(id, target, options).await
    }

    async fn parameter_call<P>(&self, input: &P, target: Cow<'static, str>, options: CallOptions) -> Result<(), DataAccessError>
    where
        P: ProcInput + Sync + ?Sized,
    {
        let procedure = Self::procedure(&target)?;
        let parameters = bind_inputs(input, self.engine.prefix());
        self.engine.execute(&procedure, parameters, options).await
    }

    async fn no_parameter_call(&self, target: Cow<'static, str>, options: CallOptions) -> Result<(), DataAccessError> {
        let procedure = Self::procedure(&target)?;
        self.engine.execute(&procedure, Vec::new(), options).await
    }
}
