//! Schema introspection tool.
//!
//! This module implements the `GetTableSchema` MCP tool:
//! - empty `tableName`: list base tables
//! - otherwise: describe the table's columns, unless the table is restricted
//!
//! The catalog queries come from the configured provider's dialect.

use crate::db::{Backend, TABLE_NAME_PARAM};
use crate::error::DbResult;
use crate::models::{NamedParam, ToolOutcome};
use crate::tools::GatewaySettings;
use crate::tools::format::{first_column_lines, rows_to_json};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, warn};

pub const TABLES_HEADER: &str = "Available tables:\n";
pub const TABLE_RESTRICTED: &str = "Access denied: Table is restricted.";
pub const SCHEMA_FAILED_PREFIX: &str = "Schema retrieval failed: ";

/// Input for the GetTableSchema tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SchemaInput {
    /// Table to describe. Leave empty to list all tables.
    #[serde(default)]
    pub table_name: String,
}

pub struct SchemaToolHandler<B> {
    backend: Arc<B>,
    settings: Arc<GatewaySettings>,
}

impl<B: Backend> SchemaToolHandler<B> {
    pub fn new(backend: Arc<B>, settings: Arc<GatewaySettings>) -> Self {
        Self { backend, settings }
    }

    /// Handle the GetTableSchema tool call.
    pub async fn get_table_schema(&self, input: SchemaInput) -> ToolOutcome {
        let table_name = input.table_name.trim();
        if table_name.is_empty() {
            return match self.list_tables().await {
                Ok(names) => ToolOutcome::success(format!("{}{}", TABLES_HEADER, names)),
                Err(e) => {
                    error!(
                        error = %e,
                        suggestion = ?e.suggestion(),
                        "Failed to list tables"
                    );
                    ToolOutcome::failed(SCHEMA_FAILED_PREFIX, e)
                }
            };
        }

        if self.settings.security.is_table_restricted(table_name) {
            warn!(table = %table_name, "Access to restricted table denied");
            return ToolOutcome::denied(TABLE_RESTRICTED);
        }

        match self.describe_table(table_name).await {
            Ok(json) => {
                ToolOutcome::success(format!("Schema for table '{}':\n{}", table_name, json))
            }
            Err(e) => {
                error!(
                    error = %e,
                    suggestion = ?e.suggestion(),
                    table = %table_name,
                    "Failed to describe table"
                );
                ToolOutcome::failed(SCHEMA_FAILED_PREFIX, e)
            }
        }
    }

    async fn list_tables(&self) -> DbResult<String> {
        let dialect = self.settings.provider.dialect();
        let rows = self.backend.fetch_rows(dialect.list_tables, &[], None).await?;
        Ok(first_column_lines(&rows))
    }

    async fn describe_table(&self, table_name: &str) -> DbResult<String> {
        let dialect = self.settings.provider.dialect();
        let params = [NamedParam::new(TABLE_NAME_PARAM, table_name)];
        let rows = self
            .backend
            .fetch_rows(dialect.describe_table, &params, None)
            .await?;
        rows_to_json(&rows)
    }
}
