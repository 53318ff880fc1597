//! MCP service implementation using rmcp.
//!
//! This module defines the GatewayService struct with the five gateway tools
//! exposed via the MCP protocol using the rmcp framework's macros. Every tool
//! answers with plain text; failures are reported in the text, never as protocol
//! errors.

use crate::db::Database;
use crate::models::ToolOutcome;
use crate::tools::{
    BackupInput, BackupToolHandler, ConnectionToolHandler, GatewaySettings, NonQueryInput,
    QueryInput, QueryToolHandler, SchemaInput, SchemaToolHandler, WriteToolHandler,
};
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct GatewayService {
    /// The single open connection
    database: Arc<Database>,
    /// Immutable settings snapshot
    settings: Arc<GatewaySettings>,
    /// Tool router for MCP tool dispatch (auto-generated)
    tool_router: ToolRouter<Self>,
}

impl GatewayService {
    pub fn new(database: Arc<Database>, settings: Arc<GatewaySettings>) -> Self {
        Self {
            database,
            settings,
            tool_router: Self::tool_router(),
        }
    }
}

fn text_result(outcome: ToolOutcome) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(
        outcome.into_text(),
    )]))
}

#[tool_router]
impl GatewayService {
    #[tool(
        name = "ExecuteQuery",
        description = "Execute a read query and return the rows as JSON.\nOnly statements starting with an allowed command (SELECT by default) are accepted.\nParameters are a JSON object of name/value pairs referenced in SQL as @name or :name.\nResults are capped at the configured row limit."
    )]
    async fn execute_query(
        &self,
        Parameters(input): Parameters<QueryInput>,
    ) -> Result<CallToolResult, McpError> {
        let handler = QueryToolHandler::new(self.database.clone(), self.settings.clone());
        text_result(handler.execute_query(input).await)
    }

    #[tool(
        name = "GetTableSchema",
        description = "Get schema information.\nWith an empty tableName, lists all tables. Otherwise returns column name, data type, nullability and default for the table.\nRestricted tables cannot be described."
    )]
    async fn get_table_schema(
        &self,
        Parameters(input): Parameters<SchemaInput>,
    ) -> Result<CallToolResult, McpError> {
        let handler = SchemaToolHandler::new(self.database.clone(), self.settings.clone());
        text_result(handler.get_table_schema(input).await)
    }

    #[tool(
        name = "ExecuteNonQuery",
        description = "Execute an INSERT, UPDATE, DELETE or DDL statement and return the number of affected rows.\nSELECT statements are rejected; use ExecuteQuery instead.\nParameters are a JSON object of name/value pairs referenced in SQL as @name or :name."
    )]
    async fn execute_non_query(
        &self,
        Parameters(input): Parameters<NonQueryInput>,
    ) -> Result<CallToolResult, McpError> {
        let handler = WriteToolHandler::new(self.database.clone());
        text_result(handler.execute_non_query(input).await)
    }

    #[tool(
        name = "BackupTable",
        description = "Export every row of a table to a file as a JSON array.\nAn existing file at backupPath is overwritten."
    )]
    async fn backup_table(
        &self,
        Parameters(input): Parameters<BackupInput>,
    ) -> Result<CallToolResult, McpError> {
        let handler = BackupToolHandler::new(self.database.clone());
        text_result(handler.backup_table(input).await)
    }

    #[tool(
        name = "GetConnectionInfo",
        description = "Get information about the database connection: database name, connection string, state and timeout."
    )]
    async fn get_connection_info(&self) -> Result<CallToolResult, McpError> {
        let handler = ConnectionToolHandler::new(self.database.clone(), self.settings.clone());
        text_result(handler.get_connection_info())
    }
}

#[tool_handler]
impl ServerHandler for GatewayService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "sql-gateway-mcp".to_owned(),
                title: Some("SQL Gateway MCP Server".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(format!(
                "SQL gateway for a single {} database.\n\
                \n\
                ## Tools\n\
                - `ExecuteQuery`: read statements; must start with an allowed command\n\
                - `ExecuteNonQuery`: INSERT/UPDATE/DELETE/DDL; SELECT is rejected\n\
                - `GetTableSchema`: empty `tableName` lists tables, otherwise describes one\n\
                - `BackupTable`: writes all rows of a table to `backupPath` as JSON\n\
                - `GetConnectionInfo`: connection metadata\n\
                \n\
                ## Parameters\n\
                Pass `parameters` as a JSON object string, e.g. `{{\"id\": 5}}`, and reference\n\
                values in SQL as `@id` or `:id`.\n\
                \n\
                Results are capped at {} rows.",
                self.settings.provider, self.settings.query_execution_limit
            )),
        }
    }
}
