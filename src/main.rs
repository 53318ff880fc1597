//! SQL Gateway MCP Server - Main entry point.
//!
//! This server exposes a policy-gated SQL gateway as MCP tools over one
//! database connection (SQLite, SQL Server, PostgreSQL or MySQL).

use sql_gateway_mcp::config::{Config, TransportMode};
use sql_gateway_mcp::db::Database;
use sql_gateway_mcp::transport::{HttpTransport, StdioTransport, Transport};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber. Logs go to stderr so stdout stays free
/// for the stdio transport.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse_args();

    if config.enable_logs {
        init_tracing(&config);
    }

    let startup = match config.resolve() {
        Ok(startup) => startup,
        Err(e) => {
            eprintln!("Error: {}", e.report());
            eprintln!();
            eprintln!("Usage: sql-gateway-mcp --settings appsettings.json");
            eprintln!("       sql-gateway-mcp --provider SQLite --connection-string \"Data Source=app.db\"");
            std::process::exit(1);
        }
    };

    info!(
        transport = %config.transport,
        provider = %startup.gateway.provider,
        "Starting SQL Gateway MCP Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let database = match Database::open(
        startup.gateway.provider,
        &startup.connection_string,
        startup.connection_timeout,
    )
    .await
    {
        Ok(database) => database,
        Err(e) => {
            error!(
                error = %e,
                suggestion = ?e.suggestion(),
                "Failed to open database connection"
            );
            eprintln!("Error: {}", e.report());
            std::process::exit(1);
        }
    };

    let database = Arc::new(database);
    let settings = Arc::new(startup.gateway);

    let result = match config.transport {
        TransportMode::Stdio => {
            info!("Using stdio transport");
            let transport = StdioTransport::new(database, settings);
            transport.run().await
        }
        TransportMode::Http => {
            info!(
                host = %config.http_host,
                port = config.http_port,
                endpoint = %config.mcp_endpoint,
                "Using HTTP transport"
            );
            let transport = HttpTransport::new(
                database,
                settings,
                &config.http_host,
                config.http_port,
                &config.mcp_endpoint,
            );
            transport.run().await
        }
    };

    if let Err(e) = result {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}
