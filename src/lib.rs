//! SQL Gateway MCP Server Library
//!
//! This library exposes a single database connection to AI assistants as MCP
//! tools: gated read queries, schema introspection, mutations, table backups
//! and connection metadata.

pub mod config;
pub mod db;
pub mod error;
pub mod mcp;
pub mod models;
pub mod tools;
pub mod transport;

pub use config::Config;
pub use db::{Backend, Database};
pub use error::DbError;
pub use mcp::GatewayService;
