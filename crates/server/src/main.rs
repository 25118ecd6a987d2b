//! browsekit MCP server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::{Context, Result};
use browsekit_client::{FetchConfig, JinaReader, JinaSearch, SearchConfig};
use browsekit_core::{AppConfig, Browser, CacheStore, ChunkRetriever};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
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

    let config = AppConfig::load().context("loading configuration")?;

    tracing::info!(
        cache_path = %config.cache_path.display(),
        max_cache_size = config.max_cache_size,
        max_chunk_chars = config.max_chunk_chars,
        "Starting browsekit server on stdio transport"
    );

    let browser = build_browser(&config)?;
    let handler = handler::BrowseServer::new(browser);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}

fn build_browser(config: &AppConfig) -> Result<Browser> {
    let store = Arc::new(CacheStore::new(config.cache_path.clone(), config.max_cache_size));
    let reader = JinaReader::new(FetchConfig::from(config)).context("building reader client")?;
    let search = JinaSearch::new(SearchConfig::from(config)).context("building search client")?;

    let retriever = ChunkRetriever::new(store, Arc::new(reader), config.max_chunk_chars);
    Ok(Browser::new(retriever, Arc::new(search), config.browse_defaults()))
}
