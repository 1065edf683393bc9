//! Jupiter MCP Server
//!
//! A Model Context Protocol server for Jupiter swaps and limit orders on Solana.

use rmcp::ServiceExt;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use jupiter_mcp::{Config, JupiterServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging. stdout carries the MCP protocol.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    tracing::info!(
        network = %config.network,
        rpc_url = %config.rpc_url,
        "Starting Jupiter MCP Server"
    );

    // Create the server
    let server = JupiterServer::new(config)?;

    // Run with stdio transport
    let transport = rmcp::transport::stdio();
    let running = server.serve(transport).await?;

    // Wait for the server to finish
    running.waiting().await?;

    Ok(())
}
