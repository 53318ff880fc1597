//! Connection info tool.
//!
//! This module implements the `GetConnectionInfo` MCP tool. The connection
//! string is reported verbatim, credentials included, unless masking is enabled.

use crate::db::Backend;
use crate::models::ToolOutcome;
use crate::tools::GatewaySettings;
use crate::tools::format::to_pretty_json;
use std::sync::Arc;
use tracing::error;

pub const CONNECTION_INFO_PREFIX: &str = "Connection info:\n";
pub const CONNECTION_INFO_FAILED_PREFIX: &str = "Failed to get connection info: ";

pub struct ConnectionToolHandler<B> {
    backend: Arc<B>,
    settings: Arc<GatewaySettings>,
}

impl<B: Backend> ConnectionToolHandler<B> {
    pub fn new(backend: Arc<B>, settings: Arc<GatewaySettings>) -> Self {
        Self { backend, settings }
    }

    /// Handle the GetConnectionInfo tool call.
    pub fn get_connection_info(&self) -> ToolOutcome {
        let mut info = self.backend.connection_info();
        if self.settings.mask_connection_string {
            info = info.masked();
        }

        match to_pretty_json(&info) {
            Ok(json) => ToolOutcome::success(format!("{}{}", CONNECTION_INFO_PREFIX, json)),
            Err(e) => {
                error!(error = %e, "Failed to serialize connection info");
                ToolOutcome::failed(CONNECTION_INFO_FAILED_PREFIX, e)
            }
        }
    }
}
