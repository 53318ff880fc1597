//! Data models for the SQL gateway.
//!
//! This module re-exports all model types used throughout the application.

pub mod connection;
pub mod outcome;
pub mod query;

// Re-export commonly used types
pub use connection::{ConnectionInfo, ConnectionState, Provider, mask_connection_string};
pub use outcome::{OutcomeKind, ToolOutcome};
pub use query::{
    DEFAULT_COMMAND_TIMEOUT_SECS, DEFAULT_CONNECTION_TIMEOUT_SECS, DEFAULT_QUERY_EXECUTION_LIMIT,
    JsonRow, NamedParam, QueryParam, QueryResult,
};
