//! Query execution tool.
//!
//! This module implements the `ExecuteQuery` MCP tool. Statements must start with
//! an allow-listed verb; anything else is blocked before reaching the database.

use crate::db::{Backend, parse_parameters};
use crate::error::DbResult;
use crate::models::{QueryResult, ToolOutcome};
use crate::tools::GatewaySettings;
use crate::tools::format::rows_to_json;
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, warn};

pub const QUERY_BLOCKED: &str = "Query blocked: Command not allowed by security policy.";
pub const NO_RESULTS: &str = "No results found.";
pub const QUERY_SUCCESS_PREFIX: &str = "Query executed successfully. Results:\n";
pub const QUERY_FAILED_PREFIX: &str = "Query failed: ";

/// Input for the ExecuteQuery tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QueryInput {
    /// SQL statement to execute. Must start with an allowed command (SELECT by default).
    pub query: String,
    /// Named parameters as a JSON object, e.g. {"id": 5}. Reference them in SQL as @id or :id.
    #[serde(default)]
    pub parameters: Option<String>,
}

pub struct QueryToolHandler<B> {
    backend: Arc<B>,
    settings: Arc<GatewaySettings>,
}

impl<B: Backend> QueryToolHandler<B> {
    pub fn new(backend: Arc<B>, settings: Arc<GatewaySettings>) -> Self {
        Self { backend, settings }
    }

    /// Handle the ExecuteQuery tool call.
    pub async fn execute_query(&self, input: QueryInput) -> ToolOutcome {
        if !self.settings.security.is_command_allowed(&input.query) {
            warn!(query = %input.query, "Query blocked by security policy");
            return ToolOutcome::blocked(QUERY_BLOCKED);
        }

        let result = match self.run(&input.query, input.parameters.as_deref()).await {
            Ok(result) => result,
            Err(e) => {
                error!(
                    error = %e,
                    sql_state = ?e.sql_state(),
                    suggestion = ?e.suggestion(),
                    query = %input.query,
                    "Query execution failed"
                );
                return ToolOutcome::failed(QUERY_FAILED_PREFIX, e);
            }
        };

        if result.rows.is_empty() {
            return ToolOutcome::success(NO_RESULTS);
        }

        match rows_to_json(&result.rows) {
            Ok(json) => ToolOutcome::success(format!("{}{}", QUERY_SUCCESS_PREFIX, json)),
            Err(e) => {
                error!(error = %e, "Failed to serialize query results");
                ToolOutcome::failed(QUERY_FAILED_PREFIX, e)
            }
        }
    }

    /// Bind, execute and truncate. The security check is the caller's job.
    ///
    /// The full result is materialized before truncation; the log carries the
    /// full count while the returned rows stop at the configured limit.
    pub async fn run(&self, query: &str, parameters: Option<&str>) -> DbResult<QueryResult> {
        let params = parse_parameters(parameters)?;
        let rows = self
            .backend
            .fetch_rows(query, &params, self.settings.command_timeout)
            .await?;

        info!(row_count = rows.len(), "Query executed successfully");

        let result = QueryResult::truncated(rows, self.settings.query_execution_limit);
        if result.is_truncated() {
            warn!(
                total_rows = result.total_rows,
                limit = self.settings.query_execution_limit,
                "Query result truncated"
            );
        }
        Ok(result)
    }
}
