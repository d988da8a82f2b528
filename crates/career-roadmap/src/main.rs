mod api;
mod cache;
mod catalog;
mod config;
mod error;
mod model;
mod progress;
mod ranker;
mod roadmap;
mod server;
mod session;
#[cfg(test)]
mod testing;

use std::sync::Arc;

use rmcp::{ServiceExt, transport::stdio};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cache::VectorCache;
use config::Config;
use ranker::Ranker;
use server::CareerRoadmapServer;
use session::Session;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout is reserved for MCP JSON-RPC
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting career-roadmap MCP server");

    let config = Config::from_env()?;
    info!(
        catalog_path = %config.catalog_path.display(),
        progress_path = %config.progress_path.display(),
        top_k = config.top_k,
        redis = config.redis_url.is_some(),
        "configuration loaded"
    );

    let catalog = catalog::load_catalog(&config.catalog_path)?;
    info!(careers = catalog.len(), "catalog loaded");

    let redis_cache = mcp_common::redis::RedisCache::new(config.redis_url.as_deref());
    if redis_cache.is_available().await {
        info!("redis connected");
    } else {
        info!("redis unavailable, running without vector cache");
    }
    let cache = Arc::new(VectorCache::new(redis_cache));

    info!("initializing embedding model (may download on first run)");
    let embedder = Arc::new(mcp_common::embedding::Embedder::new().await?);
    info!(dimensions = embedder.dimensions(), "embedding model ready");

    let session = Session::new(
        catalog,
        Ranker::new(embedder, cache),
        config.progress_path.clone(),
        config.top_k,
    );
    let server = CareerRoadmapServer::new(session);

    if let Some(addr) = config.tcp_listen_addr.as_deref() {
        let listener = TcpListener::bind(addr).await?;
        info!(listen_addr = %addr, "MCP server ready, serving on TCP");
        loop {
            let (stream, peer) = listener.accept().await?;
            let server = server.clone();
            tokio::spawn(async move {
                info!(peer = %peer, "MCP client connected");
                let service = server.serve(stream).await.inspect_err(|e| {
                    tracing::error!(error = %e, "MCP server error");
                })?;
                service.waiting().await?;
                info!(peer = %peer, "MCP client disconnected");
                Ok::<(), anyhow::Error>(())
            });
        }
    } else {
        info!("MCP server ready, serving on stdio");
        let service = server.serve(stdio()).await.inspect_err(|e| {
            tracing::error!(error = %e, "MCP server error");
        })?;
        service.waiting().await?;
        info!("MCP server shut down");
    }
    Ok(())
}
