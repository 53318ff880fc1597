//! Shared fixtures for the gateway integration tests.

#![allow(dead_code)]

use serde_json::json;
use sql_gateway_mcp::db::{Backend, Database};
use sql_gateway_mcp::error::{DbError, DbResult};
use sql_gateway_mcp::models::{
    ConnectionInfo, ConnectionState, JsonRow, NamedParam, Provider,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::fmt::MakeWriter;

/// A statement as it reached the backend.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub sql: String,
    pub params: Vec<NamedParam>,
    pub timeout: Option<Duration>,
}

/// Backend that returns canned results and records every call.
pub struct MockBackend {
    rows: Vec<JsonRow>,
    rows_affected: u64,
    error: Option<String>,
    connection_string: String,
    calls: AtomicUsize,
    recorded: Mutex<Vec<RecordedCall>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            rows_affected: 0,
            error: None,
            connection_string: "Data Source=mock.db".to_string(),
            calls: AtomicUsize::new(0),
            recorded: Mutex::new(Vec::new()),
        }
    }

    pub fn with_rows(mut self, rows: Vec<JsonRow>) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_rows_affected(mut self, rows_affected: u64) -> Self {
        self.rows_affected = rows_affected;
        self
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }

    pub fn with_connection_string(mut self, connection_string: impl Into<String>) -> Self {
        self.connection_string = connection_string.into();
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn recorded(&self) -> Vec<RecordedCall> {
        self.recorded.lock().unwrap().clone()
    }

    fn record(&self, sql: &str, params: &[NamedParam], timeout: Option<Duration>) -> DbResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.recorded.lock().unwrap().push(RecordedCall {
            sql: sql.to_string(),
            params: params.to_vec(),
            timeout,
        });
        match &self.error {
            Some(message) => Err(DbError::database(
                message.clone(),
                Some("42P01".to_string()),
                "Check the SQL syntax and referenced objects",
            )),
            None => Ok(()),
        }
    }
}

impl Backend for MockBackend {
    fn provider(&self) -> Provider {
        Provider::SQLite
    }

    async fn fetch_rows(
        &self,
        sql: &str,
        params: &[NamedParam],
        timeout: Option<Duration>,
    ) -> DbResult<Vec<JsonRow>> {
        self.record(sql, params, timeout)?;
        Ok(self.rows.clone())
    }

    async fn execute(
        &self,
        sql: &str,
        params: &[NamedParam],
        timeout: Option<Duration>,
    ) -> DbResult<u64> {
        self.record(sql, params, timeout)?;
        Ok(self.rows_affected)
    }

    fn connection_info(&self) -> ConnectionInfo {
        ConnectionInfo {
            database: "main".to_string(),
            connection_string: self.connection_string.clone(),
            state: ConnectionState::Open,
            connection_timeout: 15,
            provider: Provider::SQLite,
            server_version: None,
        }
    }
}

/// Build `n` rows of the form `{"id": i, "name": "user{i}"}`.
pub fn numbered_rows(n: usize) -> Vec<JsonRow> {
    (0..n)
        .map(|i| {
            let mut row = JsonRow::new();
            row.insert("id".to_string(), json!(i));
            row.insert("name".to_string(), json!(format!("user{}", i)));
            row
        })
        .collect()
}

/// Open an in-memory SQLite database.
pub async fn memory_database() -> Arc<Database> {
    let database = Database::open(Provider::SQLite, ":memory:", Duration::from_secs(5))
        .await
        .unwrap();
    Arc::new(database)
}

/// In-memory SQLite database with a populated `users` table and a restricted
/// `Admin_Settings` table.
pub async fn seeded_database() -> Arc<Database> {
    let database = memory_database().await;
    for sql in [
        "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL, email TEXT, active INTEGER DEFAULT 1)",
        "INSERT INTO users (id, name, email) VALUES (1, 'alice', 'alice@example.com')",
        "INSERT INTO users (id, name, email) VALUES (2, 'bob', NULL)",
        "INSERT INTO users (id, name, email) VALUES (3, 'carol', 'carol@example.com')",
        "CREATE TABLE Admin_Settings (key TEXT PRIMARY KEY, value TEXT)",
        "INSERT INTO Admin_Settings (key, value) VALUES ('api_key', 'secret')",
    ] {
        database.execute(sql, &[], None).await.unwrap();
    }
    database
}

/// In-memory sink for formatted tracing output.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    /// Plain-text subscriber writing every event at INFO and above into this buffer.
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync + use<> {
        tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
