use anyhow::{Context, Result};
use clap::Parser;
use serpbridge_mcp::{stdio, upstream_registry, McpServer, RequestContext};
use std::sync::Arc;

mod api;
mod config;
mod middleware;
mod sessions;
mod tls;

use config::{Cli, ServerConfig, TransportMode};
use middleware::AuthPolicy;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs always go to stderr: in stdio mode stdout carries the protocol
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "serpbridge=info,tower_http=info".into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::load(&cli).context("Failed to load configuration")?;

    tracing::info!("Starting serpbridge {} in {:?} mode", env!("CARGO_PKG_VERSION"), config.mode);
    tracing::debug!("Configuration: {:?}", config);

    let client = config
        .upstream_client()
        .context("Failed to configure upstream client")?;
    let has_fallback_key = client.has_default_key();
    tracing::info!("Upstream API at {}", client.config().base_url);

    let registry = upstream_registry(Arc::new(client));
    tracing::info!("Registered {} tools", registry.len());
    let server = McpServer::new(registry);

    if config.mode == TransportMode::Stdio {
        if !has_fallback_key {
            tracing::warn!("SERPBRIDGE_API_KEY is not set; tool calls will fail with unauthorized");
        }
        stdio::serve_stdio(&server, RequestContext::default())
            .await
            .context("stdio transport failed")?;
        return Ok(());
    }

    let addr = config.bind_addr()?;
    let app = api::create_router(
        api::AppState::new(server),
        &config.mcp_path,
        AuthPolicy { has_fallback_key },
    );
    tracing::info!("MCP endpoint at {}", config.mcp_path);

    match config.mode {
        TransportMode::Http => api::serve(addr, app).await?,
        TransportMode::Https => {
            tls::install_crypto_provider();
            tls::serve_https(addr, app, &config.tls, config.certificate_names()).await?
        }
        TransportMode::Acme => {
            tls::install_crypto_provider();
            tls::serve_acme(addr, app, &config.tls).await?
        }
        TransportMode::Stdio => {}
    }

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM
pub(crate) async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
