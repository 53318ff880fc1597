//! Configuration handling for the SQL gateway.
//!
//! Two layers:
//! - CLI arguments and environment variables (`Config`, via clap)
//! - a JSON settings document (`appsettings.json` by default)
//!
//! CLI values win over the settings document. The result is a [`StartupSettings`]
//! holding what is needed to open the connection plus the immutable
//! [`GatewaySettings`] snapshot the tools read.

use crate::error::{DbError, DbResult};
use crate::models::{
    DEFAULT_COMMAND_TIMEOUT_SECS, DEFAULT_CONNECTION_TIMEOUT_SECS, DEFAULT_QUERY_EXECUTION_LIMIT,
    Provider,
};
use crate::tools::{GatewaySettings, SecurityPolicy};
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
pub const DEFAULT_HTTP_PORT: u16 = 8080;
pub const DEFAULT_MCP_ENDPOINT: &str = "/";
pub const DEFAULT_SETTINGS_FILE: &str = "appsettings.json";
pub const DEFAULT_PROVIDER: &str = "SQLite";

/// Transport mode for the MCP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TransportMode {
    /// Standard input/output (for CLI integration)
    #[default]
    Stdio,
    /// Streamable HTTP (for web clients)
    Http,
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdio => write!(f, "stdio"),
            Self::Http => write!(f, "http"),
        }
    }
}

/// Command line configuration for the SQL gateway.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "sql-gateway-mcp",
    about = "MCP server exposing a policy-gated SQL gateway for SQLite, SQL Server, PostgreSQL and MySQL",
    version,
    author
)]
pub struct Config {
    /// Path to the JSON settings document. Defaults to ./appsettings.json when present.
    #[arg(short = 's', long = "settings", value_name = "FILE", env = "MCP_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Database provider (SQLite, SqlServer, PostgreSQL, MySQL). Overrides DatabaseSettings.Provider.
    #[arg(short = 'p', long, env = "MCP_PROVIDER")]
    pub provider: Option<String>,

    /// Connection string. Overrides the ConnectionStrings entry for the provider.
    #[arg(short = 'c', long, value_name = "CONNECTION_STRING", env = "MCP_CONNECTION_STRING")]
    pub connection_string: Option<String>,

    /// Transport mode (stdio or http)
    #[arg(
        short,
        long,
        value_enum,
        default_value = "stdio",
        env = "MCP_TRANSPORT"
    )]
    pub transport: TransportMode,

    /// HTTP host to bind to (only used with http transport)
    #[arg(
        long,
        default_value = DEFAULT_HTTP_HOST,
        env = "MCP_HTTP_HOST"
    )]
    pub http_host: String,

    /// HTTP port to bind to (only used with http transport)
    #[arg(
        long,
        default_value_t = DEFAULT_HTTP_PORT,
        env = "MCP_HTTP_PORT"
    )]
    pub http_port: u16,

    /// MCP endpoint path (only used with http transport)
    #[arg(
        long,
        default_value = DEFAULT_MCP_ENDPOINT,
        env = "MCP_ENDPOINT"
    )]
    pub mcp_endpoint: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "MCP_LOG_LEVEL")]
    pub log_level: String,

    /// Enable JSON logging format
    #[arg(long, env = "MCP_JSON_LOGS")]
    pub json_logs: bool,

    /// Enable logging output to stderr
    #[arg(long, env = "MCP_ENABLE_LOGS")]
    pub enable_logs: bool,
}

impl Config {
    /// Parse configuration from command line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Create a default configuration (useful for testing).
    pub fn default_config() -> Self {
        Self {
            settings: None,
            provider: None,
            connection_string: None,
            transport: TransportMode::Stdio,
            http_host: DEFAULT_HTTP_HOST.to_string(),
            http_port: DEFAULT_HTTP_PORT,
            mcp_endpoint: DEFAULT_MCP_ENDPOINT.to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            enable_logs: false,
        }
    }

    /// Get the HTTP bind address.
    pub fn http_bind_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }

    /// Load the settings document and apply CLI overrides.
    pub fn resolve(&self) -> DbResult<StartupSettings> {
        let settings = match &self.settings {
            Some(path) => AppSettings::load(path)?,
            None => AppSettings::load_or_default(Path::new(DEFAULT_SETTINGS_FILE))?,
        };
        StartupSettings::build(settings, self.provider.as_deref(), self.connection_string.as_deref())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

// =============================================================================
// Settings Document
// =============================================================================

/// The JSON settings document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AppSettings {
    /// Connection strings keyed by provider name
    #[serde(default)]
    pub connection_strings: HashMap<String, String>,
    #[serde(default)]
    pub database_settings: DatabaseSettings,
    /// Absent section means the default policy (SELECT only)
    #[serde(default)]
    pub security: Option<SecuritySettings>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DatabaseSettings {
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Seconds; 0 disables the deadline
    #[serde(default = "default_command_timeout")]
    pub command_timeout: u64,
    #[serde(default = "default_query_execution_limit")]
    pub query_execution_limit: usize,
    /// Seconds
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,
}

fn default_provider() -> String {
    DEFAULT_PROVIDER.to_string()
}

fn default_command_timeout() -> u64 {
    DEFAULT_COMMAND_TIMEOUT_SECS
}

fn default_query_execution_limit() -> usize {
    DEFAULT_QUERY_EXECUTION_LIMIT
}

fn default_connection_timeout() -> u64 {
    DEFAULT_CONNECTION_TIMEOUT_SECS
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            command_timeout: default_command_timeout(),
            query_execution_limit: default_query_execution_limit(),
            connection_timeout: default_connection_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SecuritySettings {
    #[serde(flatten)]
    pub policy: SecurityPolicy,
    #[serde(default)]
    pub mask_connection_string: bool,
}

impl AppSettings {
    /// Load a settings document that must exist.
    pub fn load(path: &Path) -> DbResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            DbError::config(format!(
                "Failed to read settings file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(&text).map_err(|e| {
            DbError::config(format!("Invalid settings file '{}': {}", path.display(), e))
        })
    }

    /// Load a settings document, falling back to defaults when the file is absent.
    pub fn load_or_default(path: &Path) -> DbResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn parse(text: &str) -> DbResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Connection string for a provider. Key lookup is case-insensitive.
    pub fn connection_string_for(&self, provider: Provider) -> Option<&str> {
        let key = provider.connection_string_key();
        self.connection_strings
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, value)| value.as_str())
    }
}

// =============================================================================
// Resolved Settings
// =============================================================================

/// Everything needed at startup: how to connect, and the tool settings snapshot.
#[derive(Debug, Clone)]
pub struct StartupSettings {
    pub connection_string: String,
    pub connection_timeout: Duration,
    pub gateway: GatewaySettings,
}

impl StartupSettings {
    pub fn build(
        settings: AppSettings,
        provider_override: Option<&str>,
        connection_string_override: Option<&str>,
    ) -> DbResult<Self> {
        let provider_name = provider_override.unwrap_or(&settings.database_settings.provider);
        let provider = Provider::from_name(provider_name);

        let connection_string = connection_string_override
            .or_else(|| settings.connection_string_for(provider))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                DbError::config(format!(
                    "No connection string configured for provider '{}'. Set ConnectionStrings.{} in the settings file or pass --connection-string",
                    provider,
                    provider.connection_string_key()
                ))
            })?
            .to_string();

        let db = &settings.database_settings;
        let command_timeout =
            (db.command_timeout > 0).then(|| Duration::from_secs(db.command_timeout));

        let (security, mask_connection_string) = match settings.security {
            Some(section) => (section.policy, section.mask_connection_string),
            None => (SecurityPolicy::default(), false),
        };

        Ok(Self {
            connection_string,
            connection_timeout: Duration::from_secs(db.connection_timeout),
            gateway: GatewaySettings {
                provider,
                command_timeout,
                query_execution_limit: db.query_execution_limit,
                security,
                mask_connection_string,
            },
        })
    }
}
