//! MCP Server Entry Point
//!
//! Initializes logging, loads configuration and the generated tool catalog,
//! and starts the server with the selected transport.

use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use hostinger_mcp_server::core::{Config, McpServer, Result, TransportConfig, TransportService};
use hostinger_mcp_server::domains::catalog::ToolCatalog;

/// MCP server exposing the Hostinger public API as callable tools.
#[derive(Debug, Parser)]
#[command(name = "hostinger-mcp-server", version)]
struct Args {
    /// Serve over SSE (HTTP) instead of stdio.
    #[arg(long)]
    sse: bool,

    /// Host to bind the SSE transport to.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind the SSE transport to.
    #[arg(long, default_value_t = 8100)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration from environment
    let config = Config::from_env();

    // Initialize logging (stderr; stdout belongs to the stdio transport)
    init_logging(&config.logging.level);

    info!("Starting {} v{}", config.server.name, config.server.version);

    let catalog = ToolCatalog::builtin()?;
    info!("Initialized {} tools", catalog.len());

    let server = McpServer::new(config, catalog)?;

    let transport_config = if args.sse {
        TransportConfig::sse(args.host, args.port)
    } else {
        TransportConfig::stdio()
    };

    let transport = TransportService::new(transport_config);
    transport.run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Configures tracing with the specified log level and format.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
