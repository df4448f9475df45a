//! Gen-PDF MCP Server - Entry point
//!
//! MCP server that turns markdown into PDFs through the Gen-PDF API.

use gen_pdf_mcp::{run_server_with_config, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();
    let config = ServerConfig::from_env();

    let default_filter = if config.debug {
        "gen_pdf_mcp=debug"
    } else {
        "gen_pdf_mcp=info"
    };

    // Initialize logging; stdout carries the MCP protocol
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Gen-PDF MCP Server");
    tracing::debug!(config = ?config, "Loaded configuration");

    run_server_with_config(config).await
}
