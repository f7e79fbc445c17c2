//! PostgreSQL call capability
//!
//! Implements the proc-access connection traits on top of sqlx. Each call
//! opens one `PgConnection`, which is closed when the boxed connection drops.
//!
//! Row-returning calls are rendered as a set-returning function call,
//! `SELECT * FROM proc(name => $1::TYPE, ...)`. Other calls use
//! `CALL proc(...)`; output parameters are passed as typed NULLs and read
//! back from the row `CALL` returns.

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::TryStreamExt;
use proc_access::{
    CallOptions, Command, Connection, Connector, Cursor, FieldMappingError, Parameter, ProcValue,
    ProcedureName, TransportError,
};
use sqlx::postgres::{PgArguments, PgConnection, PgRow};
use sqlx::{Arguments, Column, Connection as _, Row, TypeInfo};
use std::time::Duration;
use type_mapping::pg_type_for_value;

/// Opens one sqlx connection per call
#[derive(Debug, Clone, Copy, Default)]
pub struct PgConnector;

impl PgConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Connector for PgConnector {
    async fn open(
        &self,
        connection_string: &str,
        options: &CallOptions,
    ) -> Result<Box<dyn Connection>, TransportError> {
        let mut conn = PgConnection::connect(connection_string)
            .await
            .map_err(TransportError::new)?;

        if let Some(timeout) = options.timeout() {
            let statement = format!("SET statement_timeout = {}", statement_timeout_ms(timeout));
            sqlx::query(&statement)
                .execute(&mut conn)
                .await
                .map_err(TransportError::new)?;
        }

        Ok(Box::new(PgProcConnection { conn }))
    }
}

struct PgProcConnection {
    conn: PgConnection,
}

impl Connection for PgProcConnection {
    fn prepare<'c>(&'c mut self, procedure: &ProcedureName) -> Box<dyn Command + 'c> {
        Box::new(PgCommand {
            conn: &mut self.conn,
            procedure: procedure.to_string(),
            parameters: Vec::new(),
            outputs: Vec::new(),
            sql: String::new(),
        })
    }
}

struct PgCommand<'c> {
    conn: &'c mut PgConnection,
    procedure: String,
    parameters: Vec<Parameter>,
    outputs: Vec<(String, ProcValue)>,
    sql: String,
}

#[async_trait]
impl Command for PgCommand<'_> {
    fn add_parameter(&mut self, parameter: Parameter) {
        self.parameters.push(parameter);
    }

    async fn execute_reader<'a>(&'a mut self) -> Result<Box<dyn Cursor + 'a>, TransportError> {
        let arguments = bind_arguments(&self.parameters)?;
        self.sql = render_select(&self.procedure, &self.parameters);
        debug_log!("[PG] {}", self.sql);

        let mut rows = sqlx::query_with(self.sql.as_str(), arguments).fetch(&mut *self.conn);
        // Pull the first row so execution errors surface here, not on advance
        let pending = rows.try_next().await.map_err(TransportError::new)?;

        Ok(Box::new(PgCursor {
            rows,
            pending,
            current: None,
            started: false,
        }))
    }

    async fn execute_non_query(&mut self) -> Result<u64, TransportError> {
        let arguments = bind_arguments(&self.parameters)?;
        self.sql = render_call(&self.procedure, &self.parameters);
        debug_log!("[PG] {}", self.sql);

        let output_names: Vec<String> = self
            .parameters
            .iter()
            .filter(|p| p.is_output())
            .map(|p| p.name.clone())
            .collect();

        if output_names.is_empty() {
            let result = sqlx::query_with(self.sql.as_str(), arguments)
                .execute(&mut *self.conn)
                .await
                .map_err(TransportError::new)?;
            return Ok(result.rows_affected());
        }

        let row = sqlx::query_with(self.sql.as_str(), arguments)
            .fetch_optional(&mut *self.conn)
            .await
            .map_err(TransportError::new)?;

        if let Some(row) = row {
            for name in output_names {
                if let Some(index) = output_column(&row, &name) {
                    let value = decode_column(&row, index).map_err(TransportError::new)?;
                    self.outputs.push((name, value));
                }
            }
        }
        Ok(0)
    }

    fn output_value(&self, name: &str) -> Option<ProcValue> {
        self.outputs
            .iter()
            .find(|(output, _)| output == name)
            .map(|(_, value)| value.clone())
    }
}

struct PgCursor<'a> {
    rows: BoxStream<'a, Result<PgRow, sqlx::Error>>,
    pending: Option<PgRow>,
    current: Option<PgRow>,
    started: bool,
}

#[async_trait]
impl Cursor for PgCursor<'_> {
    async fn advance(&mut self) -> Result<bool, TransportError> {
        self.current = if self.started {
            self.rows.try_next().await.map_err(TransportError::new)?
        } else {
            self.started = true;
            self.pending.take()
        };
        Ok(self.current.is_some())
    }

    fn get_field(&self, name: &str) -> Result<Option<ProcValue>, FieldMappingError> {
        let row = self
            .current
            .as_ref()
            .ok_or_else(|| FieldMappingError::undecodable(name, "cursor is not on a row"))?;

        match row
            .columns()
            .iter()
            .position(|column| column.name().eq_ignore_ascii_case(name))
        {
            Some(index) => decode_column(row, index).map(Some),
            None => Ok(None),
        }
    }
}

/// Whole milliseconds, rounded up. Zero would disable the server-side timeout.
fn statement_timeout_ms(timeout: Duration) -> u128 {
    timeout.as_micros().div_ceil(1000).max(1)
}

/// Quote a parameter name unless it is a plain identifier
fn parameter_name(name: &str) -> String {
    let plain = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}

/// `name => $n::TYPE` per parameter; NULL inputs and outputs are inlined
fn render_arguments(parameters: &[Parameter]) -> String {
    let mut placeholder = 0;
    parameters
        .iter()
        .map(|parameter| {
            let value = match (&parameter.width, pg_type_for_value(&parameter.value)) {
                (Some(width), _) if parameter.is_output() => format!("NULL::{}", width.pg_type()),
                (_, Some(pg_type)) if !parameter.is_output() => {
                    placeholder += 1;
                    format!("${}::{}", placeholder, pg_type)
                }
                _ => "NULL".to_string(),
            };
            format!("{} => {}", parameter_name(&parameter.name), value)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn render_select(procedure: &str, parameters: &[Parameter]) -> String {
    format!("SELECT * FROM {}({})", procedure, render_arguments(parameters))
}

pub(crate) fn render_call(procedure: &str, parameters: &[Parameter]) -> String {
    format!("CALL {}({})", procedure, render_arguments(parameters))
}

/// Bind every non-null input in order, matching the placeholders of `render_arguments`
fn bind_arguments(parameters: &[Parameter]) -> Result<PgArguments, TransportError> {
    let mut arguments = PgArguments::default();
    for parameter in parameters.iter().filter(|p| !p.is_output()) {
        let added = match &parameter.value {
            ProcValue::Null => Ok(()),
            ProcValue::Bool(v) => arguments.add(*v),
            ProcValue::TinyInt(v) => arguments.add(i16::from(*v)),
            ProcValue::SmallInt(v) => arguments.add(*v),
            ProcValue::Int(v) => arguments.add(*v),
            ProcValue::BigInt(v) => arguments.add(*v),
            ProcValue::Float(v) => arguments.add(*v),
            ProcValue::Text(v) => arguments.add(v.clone()),
            ProcValue::Timestamp(v) => arguments.add(*v),
            ProcValue::DateTime(v) => arguments.add(*v),
            ProcValue::Date(v) => arguments.add(*v),
            ProcValue::Uuid(v) => arguments.add(*v),
            ProcValue::Json(v) => arguments.add(v.clone()),
            ProcValue::Bytes(v) => arguments.add(v.clone()),
        };
        added.map_err(TransportError::new)?;
    }
    Ok(arguments)
}

/// Column of a CALL result row holding the output parameter `name`.
/// Matches the name as given or without its prefix sigil, case-insensitively;
/// a single-column row is taken as the only output.
fn output_column(row: &PgRow, name: &str) -> Option<usize> {
    let bare = name.trim_start_matches(|c: char| !c.is_ascii_alphanumeric() && c != '_');
    row.columns()
        .iter()
        .position(|column| {
            column.name().eq_ignore_ascii_case(name) || column.name().eq_ignore_ascii_case(bare)
        })
        .or_else(|| (row.columns().len() == 1).then_some(0))
}

fn decode_column(row: &PgRow, index: usize) -> Result<ProcValue, FieldMappingError> {
    let column = &row.columns()[index];
    let name = column.name();
    let undecodable = |e: sqlx::Error| FieldMappingError::undecodable(name, e.to_string());

    let value = match column.type_info().name() {
        "BOOL" => row.try_get::<Option<bool>, _>(index).map_err(undecodable)?.into(),
        "INT2" => row.try_get::<Option<i16>, _>(index).map_err(undecodable)?.into(),
        "INT4" => row.try_get::<Option<i32>, _>(index).map_err(undecodable)?.into(),
        "INT8" => row.try_get::<Option<i64>, _>(index).map_err(undecodable)?.into(),
        "FLOAT4" => row.try_get::<Option<f32>, _>(index).map_err(undecodable)?.into(),
        "FLOAT8" => row.try_get::<Option<f64>, _>(index).map_err(undecodable)?.into(),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => {
            row.try_get::<Option<String>, _>(index).map_err(undecodable)?.into()
        }
        "TIMESTAMPTZ" => row
            .try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(index)
            .map_err(undecodable)?
            .into(),
        "TIMESTAMP" => row
            .try_get::<Option<chrono::NaiveDateTime>, _>(index)
            .map_err(undecodable)?
            .into(),
        "DATE" => row
            .try_get::<Option<chrono::NaiveDate>, _>(index)
            .map_err(undecodable)?
            .into(),
        "UUID" => row.try_get::<Option<uuid::Uuid>, _>(index).map_err(undecodable)?.into(),
        "JSON" | "JSONB" => row
            .try_get::<Option<serde_json::Value>, _>(index)
            .map_err(undecodable)?
            .into(),
        "BYTEA" => row.try_get::<Option<Vec<u8>>, _>(index).map_err(undecodable)?.into(),
        other => {
            return Err(FieldMappingError::undecodable(
                name,
                format!("unsupported column type {}", other),
            ))
        }
    };
    Ok(value)
}
