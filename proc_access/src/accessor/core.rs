use crate::errors::DataAccessError;
use crate::id_type::Identifier;
use crate::marshal::{id_output_parameter, id_parameter, materialize, materialize_all, read_output_id};
use crate::options::CallOptions;
use crate::traits::connection::{Connection, Connector, Parameter};
use crate::traits::record::Record;
use crate::validation::ProcedureName;
use config::AccessConfig;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Naming and timeout settings shared by both accessors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessSettings {
    pub parameter_prefix: String,
    pub id_parameter: String,
    pub default_timeout: Option<Duration>,
}

impl Default for AccessSettings {
    fn default() -> Self {
        Self {
            parameter_prefix: "@".to_string(),
            id_parameter: "Id".to_string(),
            default_timeout: None,
        }
    }
}

impl From<&AccessConfig> for AccessSettings {
    fn from(config: &AccessConfig) -> Self {
        Self {
            parameter_prefix: config.parameter_prefix.clone(),
            id_parameter: config.id_parameter.clone(),
            default_timeout: match config.command_timeout_seconds {
                0 => None,
                seconds => Some(Duration::from_secs(seconds)),
            },
        }
    }
}

/// The call pipeline both accessors share: open, bind, execute, read.
///
/// Every call opens its own connection inside one future. Leaving that future
/// on any path (success, error, timeout, caller drop) drops the cursor, then
/// the command, then the connection.
#[derive(Clone)]
pub(crate) struct CallEngine {
    connector: Arc<dyn Connector>,
    connection_string: Arc<str>,
    settings: Arc<AccessSettings>,
}

impl std::fmt::Debug for CallEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallEngine")
            .field("settings", &self.settings)
            .finish()
    }
}

impl CallEngine {
    pub(crate) fn new(
        connector: Arc<dyn Connector>,
        connection_string: Arc<str>,
        settings: AccessSettings,
    ) -> Self {
        Self {
            connector,
            connection_string,
            settings: Arc::new(settings),
        }
    }

    pub(crate) fn settings(&self) -> &AccessSettings {
        &self.settings
    }

    pub(crate) fn with_settings(mut self, settings: AccessSettings) -> Self {
        self.settings = Arc::new(settings);
        self
    }

    pub(crate) fn prefix(&self) -> &str {
        &self.settings.parameter_prefix
    }

    pub(crate) fn id_input<TID: Identifier>(&self, id: TID) -> Parameter {
        id_parameter(id, &self.settings.parameter_prefix, &self.settings.id_parameter)
    }

    async fn open(
        &self,
        procedure: &ProcedureName,
        options: &CallOptions,
    ) -> Result<Box<dyn Connection>, DataAccessError> {
        self.connector
            .open(&self.connection_string, options)
            .await
            .map_err(|e| DataAccessError::transport(procedure.as_str(), e))
    }

    async fn with_deadline<R, F>(
        &self,
        procedure: &ProcedureName,
        options: CallOptions,
        call: F,
    ) -> Result<R, DataAccessError>
    where
        F: Future<Output = Result<R, DataAccessError>>,
    {
        match options.timeout() {
            Some(timeout) => tokio::time::timeout(timeout, call)
                .await
                .map_err(|_| DataAccessError::Timeout {
                    procedure: procedure.to_string(),
                    timeout,
                })?,
            None => call.await,
        }
    }

    /// Read the first row. `not_found_key` is only rendered when there is none.
    pub(crate) async fn fetch_one<T, K>(
        &self,
        procedure: &ProcedureName,
        parameters: Vec<Parameter>,
        not_found_key: K,
        options: CallOptions,
    ) -> Result<T, DataAccessError>
    where
        T: Record,
        K: FnOnce() -> String + Send,
    {
        let options = options.or_default(self.settings.default_timeout);
        debug_log!("[FETCH_ONE] Procedure: {}, parameters: {}", procedure, parameters.len());

        self.with_deadline(procedure, options, async move {
            let mut connection = self.open(procedure, &options).await?;
            let mut command = connection.prepare(procedure);
            for parameter in parameters {
                command.add_parameter(parameter);
            }

            let mut cursor = command
                .execute_reader()
                .await
                .map_err(|e| DataAccessError::transport(procedure.as_str(), e))?;
            let has_row = cursor
                .advance()
                .await
                .map_err(|e| DataAccessError::transport(procedure.as_str(), e))?;
            if !has_row {
                debug_log!("[FETCH_ONE] No row from {}", procedure);
                return Err(DataAccessError::not_found(not_found_key(), procedure.as_str()));
            }
            materialize::<T>(&*cursor, procedure.as_str())
        })
        .await
    }

    /// Read every row, in cursor order
    pub(crate) async fn fetch_all<T: Record>(
        &self,
        procedure: &ProcedureName,
        parameters: Vec<Parameter>,
        options: CallOptions,
    ) -> Result<Vec<T>, DataAccessError> {
        let options = options.or_default(self.settings.default_timeout);
        debug_log!("[FETCH_ALL] Procedure: {}, parameters: {}", procedure, parameters.len());

        self.with_deadline(procedure, options, async move {
            let mut connection = self.open(procedure, &options).await?;
            let mut command = connection.prepare(procedure);
            for parameter in parameters {
                command.add_parameter(parameter);
            }

            let mut cursor = command
                .execute_reader()
                .await
                .map_err(|e| DataAccessError::transport(procedure.as_str(), e))?;
            let items = materialize_all::<T>(&mut *cursor, procedure.as_str()).await?;
            trace_log!("[FETCH_ALL] {} rows from {}", items.len(), procedure);
            Ok::<_, DataAccessError>(items)
        })
        .await
    }

    /// Execute for side effects only
    pub(crate) async fn execute(
        &self,
        procedure: &ProcedureName,
        parameters: Vec<Parameter>,
        options: CallOptions,
    ) -> Result<(), DataAccessError> {
        let options = options.or_default(self.settings.default_timeout);
        debug_log!("[EXECUTE] Procedure: {}, parameters: {}", procedure, parameters.len());

        self.with_deadline(procedure, options, async move {
            let mut connection = self.open(procedure, &options).await?;
            let mut command = connection.prepare(procedure);
            for parameter in parameters {
                command.add_parameter(parameter);
            }

            let _affected = command
                .execute_non_query()
                .await
                .map_err(|e| DataAccessError::transport(procedure.as_str(), e))?;
            trace_log!("[EXECUTE] {} affected {} rows", procedure, _affected);
            Ok::<_, DataAccessError>(())
        })
        .await
    }

    /// Execute with an identifier output parameter appended, and return its value
    pub(crate) async fn execute_for_id<TID: Identifier>(
        &self,
        procedure: &ProcedureName,
        parameters: Vec<Parameter>,
        options: CallOptions,
    ) -> Result<TID, DataAccessError> {
        let options = options.or_default(self.settings.default_timeout);
        let output = id_output_parameter::<TID>(&self.settings.parameter_prefix, &self.settings.id_parameter);
        debug_log!(
            "[INSERT] Procedure: {}, parameters: {}, output: {} ({:?})",
            procedure,
            parameters.len(),
            output.name,
            TID::WIDTH
        );

        self.with_deadline(procedure, options, async move {
            let output_name = output.name.clone();
            let mut connection = self.open(procedure, &options).await?;
            let mut command = connection.prepare(procedure);
            for parameter in parameters {
                command.add_parameter(parameter);
            }
            command.add_parameter(output);

            command
                .execute_non_query()
                .await
                .map_err(|e| DataAccessError::transport(procedure.as_str(), e))?;
            read_output_id::<TID>(&*command, &output_name, procedure.as_str())
        })
        .await
    }
}
