//! Database abstraction layer.
//!
//! This module provides database access functionality:
//! - The live connection ([`Database`]) and the [`Backend`] seam the tools run against
//! - Statement execution per driver
//! - Provider-specific catalog queries
//! - Named parameter binding
//! - Type mappings

pub mod connection;
pub mod dialect;
pub mod executor;
pub mod params;
pub mod types;

pub use connection::Database;
pub use dialect::{Dialect, TABLE_NAME_PARAM, dialect_for};
pub use params::{BindSyntax, BoundStatement, PlaceholderStyle, bind_named, parse_parameters};

use crate::error::DbResult;
use crate::models::{ConnectionInfo, JsonRow, NamedParam, Provider};
use std::future::Future;
use std::time::Duration;

/// The open connection as seen by the tool handlers.
///
/// Handlers are generic over this trait so tests can substitute an in-memory
/// database or a recording mock for the production [`Database`].
pub trait Backend: Send + Sync + 'static {
    fn provider(&self) -> Provider;

    /// Run a row-returning statement. `timeout` of `None` waits indefinitely.
    fn fetch_rows(
        &self,
        sql: &str,
        params: &[NamedParam],
        timeout: Option<Duration>,
    ) -> impl Future<Output = DbResult<Vec<JsonRow>>> + Send;

    /// Run a statement and return the number of affected rows.
    fn execute(
        &self,
        sql: &str,
        params: &[NamedParam],
        timeout: Option<Duration>,
    ) -> impl Future<Output = DbResult<u64>> + Send;

    fn connection_info(&self) -> ConnectionInfo;
}
