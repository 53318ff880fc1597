//! Table backup tool.
//!
//! This module implements the `BackupTable` MCP tool: every row of a table is
//! written to a file as a pretty-printed JSON array, replacing any existing file.
//!
//! The table name is interpolated into `SELECT * FROM {table}` unescaped and the
//! restricted-table list is not consulted.

use crate::db::Backend;
use crate::error::DbResult;
use crate::models::ToolOutcome;
use crate::tools::format::rows_to_json;
use humansize::{DECIMAL, format_size};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};

pub const BACKUP_FAILED_PREFIX: &str = "Backup failed: ";

/// Input for the BackupTable tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BackupInput {
    /// Table to export
    pub table_name: String,
    /// Destination file path. An existing file is overwritten.
    pub backup_path: String,
}

pub struct BackupToolHandler<B> {
    backend: Arc<B>,
}

impl<B: Backend> BackupToolHandler<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Handle the BackupTable tool call.
    pub async fn backup_table(&self, input: BackupInput) -> ToolOutcome {
        match self.run(&input.table_name, &input.backup_path).await {
            Ok(bytes) => {
                info!(
                    table = %input.table_name,
                    path = %input.backup_path,
                    size = %format_size(bytes, DECIMAL),
                    "Table backed up"
                );
                ToolOutcome::success(format!(
                    "Table '{}' backed up successfully to '{}'",
                    input.table_name, input.backup_path
                ))
            }
            Err(e) => {
                error!(
                    error = %e,
                    suggestion = ?e.suggestion(),
                    table = %input.table_name,
                    path = %input.backup_path,
                    "Backup failed"
                );
                ToolOutcome::failed(BACKUP_FAILED_PREFIX, e)
            }
        }
    }

    /// Returns the number of bytes written.
    async fn run(&self, table_name: &str, backup_path: &str) -> DbResult<usize> {
        let sql = format!("SELECT * FROM {}", table_name);
        let rows = self.backend.fetch_rows(&sql, &[], None).await?;
        let json = rows_to_json(&rows)?;
        tokio::fs::write(backup_path, json.as_bytes()).await?;
        Ok(json.len())
    }
}
