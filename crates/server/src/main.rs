//! mcp-websearch server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;
use websearch_core::AppConfig;

mod error;
mod handler;
mod state;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, "failed to load configuration");
            std::process::exit(1);
        }
    };

    // Provider construction is the one fatal failure in the system: without
    // a working provider every request would fail, so refuse to start.
    let provider = match websearch_client::create_provider(&config) {
        Ok(provider) => provider,
        Err(err) => {
            tracing::error!(provider = %config.provider, error = %err, "failed to initialize provider");
            std::process::exit(1);
        }
    };

    let state = match state::AppState::new(config, provider) {
        Ok(state) => Arc::new(state),
        Err(err) => {
            tracing::error!(error = %err, "failed to build server state");
            std::process::exit(1);
        }
    };

    tracing::info!(provider = state.provider.name(), "starting mcp-websearch server on stdio transport");

    let handler = handler::WebSearchServer::new(state);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
