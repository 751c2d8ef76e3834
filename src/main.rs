//! STAC MCP Server Entry Point
//!
//! Loads configuration, initializes logging, probes the STAC API and starts
//! the server with the configured transport. Any startup failure exits with
//! a non-zero status.

use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use stac_mcp_server::core::config::LoggingConfig;
use stac_mcp_server::core::{Config, McpServer, TransportService};
use stac_mcp_server::domains::tools::ToolContext;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment
    let config = Config::from_env();

    // Initialize logging
    init_logging(&config.logging);

    info!("Starting {} v{}", config.server.name, config.server.version);

    serve(config).await?;

    info!("Server shutting down");

    Ok(())
}

/// Validate the configuration, build the server and run the transport.
async fn serve(config: Config) -> stac_mcp_server::Result<()> {
    config.validate()?;

    let context = ToolContext::new(&config)?;
    let transport = TransportService::new(config.transport.clone());
    let server = McpServer::new(config, context);

    server.probe_upstream().await;
    info!("Server initialized");

    transport.run(server).await?;
    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs always go to stderr: with the STDIO transport, stdout carries
/// protocol frames only.
fn init_logging(logging: &LoggingConfig) {
    let level = match logging.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(logging.ansi)
        .with_writer(std::io::stderr);

    if logging.with_timestamps {
        builder.init();
    } else {
        builder.without_time().init();
    }
}
