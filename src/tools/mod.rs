//! MCP tool implementations.
//!
//! This module contains all gateway tool handlers:
//! - `query`: Execute allow-listed read statements (`ExecuteQuery`)
//! - `write`: Execute mutating statements (`ExecuteNonQuery`)
//! - `schema`: List tables or describe one table (`GetTableSchema`)
//! - `backup`: Dump a table to a JSON file (`BackupTable`)
//! - `connection`: Report connection metadata (`GetConnectionInfo`)
//! - `security`: Verb allow-list and restricted-table checks
//!
//! Handlers never return errors. Every outcome, including failures, is a
//! [`ToolOutcome`](crate::models::ToolOutcome) carrying the text sent to the client.

pub mod backup;
pub mod connection;
pub mod format;
pub mod query;
pub mod schema;
pub mod security;
pub mod write;

pub use backup::{BackupInput, BackupToolHandler};
pub use connection::ConnectionToolHandler;
pub use query::{QueryInput, QueryToolHandler};
pub use schema::{SchemaInput, SchemaToolHandler};
pub use security::SecurityPolicy;
pub use write::{NonQueryInput, WriteToolHandler};

use crate::models::{DEFAULT_COMMAND_TIMEOUT_SECS, DEFAULT_QUERY_EXECUTION_LIMIT, Provider};
use std::time::Duration;

/// Immutable settings snapshot shared by every tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewaySettings {
    pub provider: Provider,
    /// Deadline for the query path. `None` waits indefinitely.
    pub command_timeout: Option<Duration>,
    pub query_execution_limit: usize,
    pub security: SecurityPolicy,
    pub mask_connection_string: bool,
}

impl GatewaySettings {
    pub fn new(provider: Provider) -> Self {
        Self {
            provider,
            ..Self::default()
        }
    }

    pub fn with_security(mut self, security: SecurityPolicy) -> Self {
        self.security = security;
        self
    }

    pub fn with_query_execution_limit(mut self, limit: usize) -> Self {
        self.query_execution_limit = limit;
        self
    }

    pub fn with_command_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.command_timeout = timeout;
        self
    }
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            provider: Provider::SQLite,
            command_timeout: Some(Duration::from_secs(DEFAULT_COMMAND_TIMEOUT_SECS)),
            query_execution_limit: DEFAULT_QUERY_EXECUTION_LIMIT,
            security: SecurityPolicy::default(),
            mask_connection_string: false,
        }
    }
}
