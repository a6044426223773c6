// Standalone stdio MCP server binary

use anyhow::{Context, Result};
use serpbridge_mcp::{stdio, upstream_registry, McpServer, RequestContext};
use serpbridge_sdk::SerpBridgeClient;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "serpbridge=info".into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .init();

    let client = SerpBridgeClient::from_env().context("failed to configure upstream client")?;
    if !client.has_default_key() {
        tracing::warn!("SERPBRIDGE_API_KEY is not set; tool calls will fail with unauthorized");
    }

    let registry = upstream_registry(Arc::new(client));
    tracing::info!("serpbridge MCP server on stdio, {} tools", registry.len());

    let server = McpServer::new(registry);
    stdio::serve_stdio(&server, RequestContext::default())
        .await
        .context("stdio transport failed")?;

    Ok(())
}
