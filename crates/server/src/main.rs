//! insyt-host entry point.
//!
//! Boots the insight pipeline and serves it over browser native messaging or
//! MCP, both on stdio. Logging goes to stderr to keep stdout for the protocol.

use std::sync::Arc;

use anyhow::Result;
use insyt_client::{GeneratorClient, GeneratorConfig, ProfileScraper};
use insyt_core::{AppConfig, CacheDb, InsightCache, Transport};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod error;
mod handler;
mod messages;
mod native;
mod pipeline;
mod tools;

use pipeline::Pipeline;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    tracing::info!(transport = ?config.transport, db_path = %config.db_path.display(), "starting insyt-host");

    let db = CacheDb::open(&config.db_path).await?;
    let cache = InsightCache::new(db, config.cache_ttl());
    match cache.sweep_expired().await {
        Ok(deleted) => tracing::debug!(deleted, "start-up sweep finished"),
        Err(e) => tracing::warn!("start-up sweep failed: {e}"),
    }

    let generator = Arc::new(GeneratorClient::new(GeneratorConfig::from(&config))?);
    let scraper = background_scraper(&config).await;

    let pipeline = Pipeline::new(cache, generator, scraper).with_coalescing(config.coalesce_requests);

    match config.transport {
        Transport::Native => {
            native::serve(pipeline, tokio::io::stdin(), tokio::io::stdout()).await?;
        }
        Transport::Mcp => {
            let handler = handler::InsightServer::new(pipeline, config.scrape_concurrency);
            let server = serve_server(handler, stdio()).await?;
            server.waiting().await?;
        }
    }

    Ok(())
}

/// Launch the browser used for enrichment. Any failure disables enrichment.
#[cfg(feature = "browser")]
async fn background_scraper(config: &AppConfig) -> Option<Arc<dyn ProfileScraper>> {
    use insyt_client::{BrowserOptions, ChromiumHost, ScrapeOptions, TabScraper};

    if !config.browser_enabled {
        tracing::info!("background scraping disabled by configuration");
        return None;
    }

    match ChromiumHost::launch(&BrowserOptions::from(config)).await {
        Ok(host) => Some(Arc::new(TabScraper::new(host, ScrapeOptions::from(config)))),
        Err(e) => {
            tracing::warn!("browser unavailable, continuing without enrichment: {e}");
            None
        }
    }
}

#[cfg(not(feature = "browser"))]
async fn background_scraper(config: &AppConfig) -> Option<Arc<dyn ProfileScraper>> {
    if config.browser_enabled {
        tracing::info!("built without browser support, continuing without enrichment");
    }
    None
}
