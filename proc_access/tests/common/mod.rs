//! Scripted in-memory call capability for accessor tests
//!
//! `MockConnector` replays one script for every call and records what the
//! engine did through a shared `Probe`: opened/released connection counters,
//! the ordered open/close events of every scoped resource, and the procedure
//! and parameters of every executed command.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use proc_access::marshal::ColumnMap;
use proc_access::{
    CallOptions, Command, Connection, Connector, Cursor, FieldMappingError, Parameter, ProcValue,
    ProcedureName, Record, RowView, TransportError,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Model used across the accessor suites
#[derive(Debug, Clone, PartialEq, Record)]
#[record(rename_all = "PascalCase")]
pub struct Test {
    pub test_date: NaiveDateTime,
    pub test_string: String,
    pub test_int: i32,
}

pub fn sample(test_int: i32) -> Test {
    Test {
        test_date: NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap(),
        test_string: "String".to_string(),
        test_int,
    }
}

pub fn row_for(test: &Test) -> ColumnMap {
    proc_access::marshal::row_of(test)
}

/// Where a scripted call fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Open,
    Execute,
    Advance,
}

#[derive(Debug, Clone, Default)]
pub struct Script {
    pub rows: Vec<ColumnMap>,
    /// Value reported for every output parameter
    pub output: Option<ProcValue>,
    pub fail_at: Option<FailAt>,
    /// Execution latency, to exercise timeouts
    pub delay: Option<Duration>,
}

impl Script {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn rows(rows: Vec<ColumnMap>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    pub fn output(value: impl Into<ProcValue>) -> Self {
        Self {
            output: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn failing(at: FailAt) -> Self {
        Self {
            fail_at: Some(at),
            ..Self::default()
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub procedure: String,
    pub parameters: Vec<Parameter>,
}

#[derive(Debug, Default)]
pub struct Probe {
    pub opened: AtomicUsize,
    pub released: AtomicUsize,
    pub events: Mutex<Vec<&'static str>>,
    pub calls: Mutex<Vec<RecordedCall>>,
    pub timeouts: Mutex<Vec<Option<Duration>>>,
    pub connection_strings: Mutex<Vec<String>>,
}

impl Probe {
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    /// Every opened connection has been released
    pub fn balanced(&self) -> bool {
        self.opened() == self.released()
    }

    pub fn events(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> RecordedCall {
        self.calls().pop().expect("no call was executed")
    }

    fn event(&self, event: &'static str) {
        self.events.lock().unwrap().push(event);
    }
}

pub struct MockConnector {
    script: Script,
    probe: Arc<Probe>,
}

impl MockConnector {
    pub fn new(script: Script) -> (Arc<Self>, Arc<Probe>) {
        let probe = Arc::new(Probe::default());
        (
            Arc::new(Self {
                script,
                probe: probe.clone(),
            }),
            probe,
        )
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn open(
        &self,
        connection_string: &str,
        options: &CallOptions,
    ) -> Result<Box<dyn Connection>, TransportError> {
        self.probe
            .connection_strings
            .lock()
            .unwrap()
            .push(connection_string.to_string());
        self.probe.timeouts.lock().unwrap().push(options.timeout());

        if self.script.fail_at == Some(FailAt::Open) {
            return Err(TransportError::new("connection refused"));
        }

        self.probe.opened.fetch_add(1, Ordering::SeqCst);
        self.probe.event("open connection");
        Ok(Box::new(MockConnection {
            script: self.script.clone(),
            probe: self.probe.clone(),
        }))
    }
}

struct MockConnection {
    script: Script,
    probe: Arc<Probe>,
}

impl Connection for MockConnection {
    fn prepare<'c>(&'c mut self, procedure: &ProcedureName) -> Box<dyn Command + 'c> {
        self.probe.event("prepare command");
        Box::new(MockCommand {
            procedure: procedure.to_string(),
            parameters: Vec::new(),
            connection: self,
        })
    }
}

impl Drop for MockConnection {
    fn drop(&mut self) {
        self.probe.event("release connection");
        self.probe.released.fetch_add(1, Ordering::SeqCst);
    }
}

struct MockCommand<'c> {
    procedure: String,
    parameters: Vec<Parameter>,
    connection: &'c mut MockConnection,
}

impl MockCommand<'_> {
    async fn run(&mut self) -> Result<(), TransportError> {
        self.connection.probe.calls.lock().unwrap().push(RecordedCall {
            procedure: self.procedure.clone(),
            parameters: self.parameters.clone(),
        });
        if let Some(delay) = self.connection.script.delay {
            tokio::time::sleep(delay).await;
        }
        if self.connection.script.fail_at == Some(FailAt::Execute) {
            return Err(TransportError::new("permission denied"));
        }
        Ok(())
    }
}

#[async_trait]
impl Command for MockCommand<'_> {
    fn add_parameter(&mut self, parameter: Parameter) {
        self.parameters.push(parameter);
    }

    async fn execute_reader<'a>(&'a mut self) -> Result<Box<dyn Cursor + 'a>, TransportError> {
        self.run().await?;
        self.connection.probe.event("open cursor");
        Ok(Box::new(MockCursor {
            rows: self.connection.script.rows.clone(),
            position: None,
            fail_advance: self.connection.script.fail_at == Some(FailAt::Advance),
            probe: self.connection.probe.clone(),
        }))
    }

    async fn execute_non_query(&mut self) -> Result<u64, TransportError> {
        self.run().await?;
        Ok(1)
    }

    fn output_value(&self, name: &str) -> Option<ProcValue> {
        self.parameters
            .iter()
            .find(|p| p.is_output() && p.name == name)
            .and(self.connection.script.output.clone())
    }
}

impl Drop for MockCommand<'_> {
    fn drop(&mut self) {
        self.connection.probe.event("finalize command");
    }
}

struct MockCursor {
    rows: Vec<ColumnMap>,
    position: Option<usize>,
    fail_advance: bool,
    probe: Arc<Probe>,
}

#[async_trait]
impl Cursor for MockCursor {
    async fn advance(&mut self) -> Result<bool, TransportError> {
        if self.fail_advance {
            return Err(TransportError::new("connection reset"));
        }
        let next = self.position.map_or(0, |p| p + 1);
        self.position = Some(next);
        Ok(next < self.rows.len())
    }

    fn get_field(&self, name: &str) -> Result<Option<ProcValue>, FieldMappingError> {
        match self.position.and_then(|p| self.rows.get(p)) {
            Some(row) => row.column(name),
            None => Err(FieldMappingError::undecodable(name, "cursor is not on a row")),
        }
    }
}

impl Drop for MockCursor {
    fn drop(&mut self) {
        self.probe.event("close cursor");
    }
}

/// The nested acquisition/release order of one row-returning call
pub const READER_EVENTS: [&str; 5] = [
    "open connection",
    "prepare command",
    "open cursor",
    "close cursor",
    "finalize command",
];

pub fn assert_nested_release(probe: &Probe) {
    let events = probe.events();
    let mut expected: Vec<&str> = READER_EVENTS.to_vec();
    expected.push("release connection");
    assert_eq!(events, expected);
}

pub fn names(call: &RecordedCall) -> Vec<&str> {
    call.parameters.iter().map(|p| p.name.as_str()).collect()
}

pub fn descriptor_name<T: Record>() -> &'static str {
    T::descriptor().name()
}
