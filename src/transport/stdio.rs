//! Stdio transport for the MCP server.
//!
//! This transport uses standard input/output for communication,
//! which is the standard mode for CLI-based MCP integrations.

use crate::db::Database;
use crate::error::{DbError, DbResult};
use crate::mcp::GatewayService;
use crate::tools::GatewaySettings;
use crate::transport::{Transport, wait_for_signal};
use rmcp::{ServiceExt, transport::stdio};
use std::sync::Arc;
use tracing::{info, warn};

/// Stdio transport implementation.
///
/// This transport reads JSON-RPC messages from stdin and writes
/// responses to stdout, following the MCP protocol specification.
pub struct StdioTransport {
    database: Arc<Database>,
    settings: Arc<GatewaySettings>,
}

impl StdioTransport {
    /// Create a new stdio transport over the open connection.
    pub fn new(database: Arc<Database>, settings: Arc<GatewaySettings>) -> Self {
        Self { database, settings }
    }
}

impl Transport for StdioTransport {
    async fn run(&self) -> DbResult<()> {
        info!("Starting MCP server with stdio transport");

        let service = GatewayService::new(self.database.clone(), self.settings.clone());

        let running_service = service.serve(stdio()).await.map_err(|e| {
            DbError::internal(format!("Failed to start stdio transport: {}", e))
        })?;

        let shutdown_requested = tokio::select! {
            result = running_service.waiting() => {
                match result {
                    Ok(_quit_reason) => {
                        info!("Stdio transport completed normally");
                    }
                    Err(e) => {
                        warn!(error = %e, "Stdio transport error");
                        self.database.close().await;
                        return Err(DbError::internal(format!(
                            "Stdio transport error: {}",
                            e
                        )));
                    }
                }
                false
            }
            _ = wait_for_signal() => {
                info!("Shutdown signal received (send again to force exit)");
                true
            }
        };

        if shutdown_requested {
            tokio::spawn(async {
                wait_for_signal().await;
                warn!("Received second signal, forcing immediate exit");
                std::process::exit(1);
            });
        }

        self.database.close().await;

        if shutdown_requested {
            // tokio::select! cannot interrupt blocking stdin reads
            info!("Exiting process");
            std::process::exit(0);
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "stdio"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Provider;
    use std::time::Duration;

    #[tokio::test]
    async fn test_stdio_transport_creation() {
        let database = Database::open(Provider::SQLite, ":memory:", Duration::from_secs(5))
            .await
            .unwrap();
        let transport =
            StdioTransport::new(Arc::new(database), Arc::new(GatewaySettings::default()));
        assert_eq!(transport.name(), "stdio");
    }
}
