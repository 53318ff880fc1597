//! Write operation tool.
//!
//! This module implements the `ExecuteNonQuery` MCP tool for INSERT, UPDATE,
//! DELETE and DDL statements. Reads are redirected to `ExecuteQuery`.
//!
//! This path applies no verb allow-list and no deadline.

use crate::db::{Backend, parse_parameters};
use crate::error::DbResult;
use crate::models::ToolOutcome;
use crate::tools::security::is_select_statement;
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;

pub const SELECT_REDIRECT: &str = "Command blocked: Use ExecuteQuery for SELECT statements.";
pub const COMMAND_SUCCESS_PREFIX: &str = "Command executed successfully. Rows affected: ";
pub const COMMAND_FAILED_PREFIX: &str = "Command failed: ";

/// Input for the ExecuteNonQuery tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NonQueryInput {
    /// SQL statement to execute (INSERT, UPDATE, DELETE, or DDL). SELECT is rejected.
    pub command: String,
    /// Named parameters as a JSON object, e.g. {"id": 5}. Reference them in SQL as @id or :id.
    #[serde(default)]
    pub parameters: Option<String>,
}

pub struct WriteToolHandler<B> {
    backend: Arc<B>,
}

impl<B: Backend> WriteToolHandler<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Handle the ExecuteNonQuery tool call.
    pub async fn execute_non_query(&self, input: NonQueryInput) -> ToolOutcome {
        if is_select_statement(&input.command) {
            return ToolOutcome::blocked(SELECT_REDIRECT);
        }

        match self.run(&input.command, input.parameters.as_deref()).await {
            Ok(rows_affected) => {
                ToolOutcome::success(format!("{}{}", COMMAND_SUCCESS_PREFIX, rows_affected))
            }
            Err(e) => ToolOutcome::failed(COMMAND_FAILED_PREFIX, e),
        }
    }

    async fn run(&self, command: &str, parameters: Option<&str>) -> DbResult<u64> {
        let params = parse_parameters(parameters)?;
        self.backend.execute(command, &params, None).await
    }
}
