//! synthese MCP server entry point.
//!
//! Boots the MCP server on stdio transport. Logging goes to stderr to avoid
//! interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use synthese_client::Pipeline;
use synthese_core::AppConfig;
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    let pipeline = Pipeline::from_config(&config).await?;

    tracing::info!(db_path = %config.db_path.display(), "Starting synthese server on stdio transport");

    let handler = handler::SyntheseServer::new(Arc::new(pipeline));
    let server = serve_server(handler, stdio()).await?;

    server.waiting().await?;

    Ok(())
}
