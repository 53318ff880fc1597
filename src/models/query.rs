//! Query-related data models.
//!
//! This module defines parameter values and the shape of fetched rows.

use serde_json::Value as JsonValue;

/// Default row cap applied by the query gateway (`QueryExecutionLimit`).
pub const DEFAULT_QUERY_EXECUTION_LIMIT: usize = 1000;

/// Default command timeout in seconds (`CommandTimeout`).
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 30;

/// Default connection timeout in seconds (`ConnectionTimeout`).
pub const DEFAULT_CONNECTION_TIMEOUT_SECS: u64 = 15;

/// A fetched row, keyed by column name in select-list order.
pub type JsonRow = serde_json::Map<String, JsonValue>;

/// A parameter value for parameterized statements.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryParam {
    /// NULL value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value (stored as i64 for maximum range)
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value
    String(String),
    /// Arrays and objects, bound as JSON
    Json(JsonValue),
}

impl From<JsonValue> for QueryParam {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(v) => Self::Bool(v),
            JsonValue::Number(n) => match n.as_i64() {
                Some(v) => Self::Int(v),
                // u64 beyond i64 range and fractional values both land here
                None => n.as_f64().map(Self::Float).unwrap_or(Self::Null),
            },
            JsonValue::String(v) => Self::String(v),
            other => Self::Json(other),
        }
    }
}

/// A named parameter as supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedParam {
    /// Name without its `@`/`:`/`$` prefix
    pub name: String,
    pub value: QueryParam,
}

impl NamedParam {
    pub fn new(name: impl AsRef<str>, value: impl Into<QueryParam>) -> Self {
        Self {
            name: name
                .as_ref()
                .trim()
                .trim_start_matches(['@', ':', '$'])
                .to_string(),
            value: value.into(),
        }
    }
}

impl From<&str> for QueryParam {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for QueryParam {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for QueryParam {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

/// Rows returned by the query gateway after applying the row cap.
#[derive(Debug, Clone)]
pub struct QueryResult {
    /// Rows that survive truncation
    pub rows: Vec<JsonRow>,
    /// Row count before truncation
    pub total_rows: usize,
}

impl QueryResult {
    /// Materialize the full row set, then keep at most `limit` rows.
    pub fn truncated(mut rows: Vec<JsonRow>, limit: usize) -> Self {
        let total_rows = rows.len();
        rows.truncate(limit);
        Self { rows, total_rows }
    }

    pub fn is_truncated(&self) -> bool {
        self.total_rows > self.rows.len()
    }
}
