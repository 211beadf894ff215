//! batch_scrape tool implementation.
//!
//! Scrapes several profiles in hidden views with bounded concurrency. Each
//! URL gets its own result; one failure never stops the batch.

use std::sync::Arc;

use insyt_client::{BatchItem, ProfileScraper, scrape_many};
use insyt_core::Error;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Upper bound on simultaneous hidden views.
const MAX_CONCURRENCY: usize = 16;

/// Input parameters for the batch_scrape tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct BatchScrapeParams {
    /// Profile URLs to scrape.
    pub urls: Vec<String>,

    /// Maximum number of hidden views open at once (default: configured value, max: 16).
    #[serde(default)]
    pub max_concurrency: Option<usize>,
}

/// Batch summary statistics.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BatchSummary {
    /// Total number of URLs processed.
    pub total: u32,
    /// Number of successful scrapes.
    pub succeeded: u32,
    /// Number of failed scrapes.
    pub failed: u32,
}

/// Output structure for the batch_scrape tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BatchScrapeOutput {
    /// Individual results for each URL (in input order).
    pub results: Vec<BatchItem>,
    /// Summary statistics.
    pub summary: BatchSummary,
}

/// Implementation of the batch_scrape tool.
pub async fn batch_scrape_impl(
    scraper: Option<&Arc<dyn ProfileScraper>>, default_concurrency: usize, params: BatchScrapeParams,
) -> Result<CallToolResult, McpError> {
    let Some(scraper) = scraper else {
        return Err(Error::BrowserUnavailable("background scraping is disabled".into()).into());
    };

    if params.urls.is_empty() {
        return Err(Error::InvalidInput("urls cannot be empty".into()).into());
    }

    let concurrency = params.max_concurrency.unwrap_or(default_concurrency).min(MAX_CONCURRENCY);
    if concurrency == 0 {
        return Err(Error::InvalidInput("max_concurrency must be at least 1".into()).into());
    }

    let results = scrape_many(scraper.clone(), params.urls, concurrency)
        .await
        .map_err(Error::from)?;

    let succeeded = results.iter().filter(|item| item.success).count() as u32;
    let total = results.len() as u32;
    let output = BatchScrapeOutput { results, summary: BatchSummary { total, succeeded, failed: total - succeeded } };

    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| McpError::internal_error(format!("Failed to serialize output: {e}"), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::text_of;
    use insyt_client::ScrapeError;
    use insyt_core::ScrapedProfile;

    struct EchoScraper;

    #[async_trait::async_trait]
    impl ProfileScraper for EchoScraper {
        async fn scrape(&self, profile_url: &str) -> Result<ScrapedProfile, ScrapeError> {
            if profile_url.ends_with("/login") {
                return Err(ScrapeError::Unauthenticated(profile_url.to_string()));
            }
            Ok(ScrapedProfile {
                name: Some("N".into()),
                title: Some("T".into()),
                location: None,
                company: None,
                profile_url: profile_url.to_string(),
                scraped_at: 0,
            })
        }
    }

    fn scraper() -> Arc<dyn ProfileScraper> {
        Arc::new(EchoScraper)
    }

    #[tokio::test]
    async fn test_batch_scrape_summary() {
        let scraper = scraper();
        let params = BatchScrapeParams {
            urls: vec!["https://x/in/a".into(), "https://x/login".into(), "https://x/in/c".into()],
            max_concurrency: Some(2),
        };

        let result = batch_scrape_impl(Some(&scraper), 2, params).await.unwrap();
        let output: BatchScrapeOutput = serde_json::from_str(&text_of(&result)).unwrap();

        assert_eq!(output.summary.total, 3);
        assert_eq!(output.summary.succeeded, 2);
        assert_eq!(output.summary.failed, 1);
        assert_eq!(output.results[1].url, "https://x/login");
        assert!(!output.results[1].success);
    }

    #[tokio::test]
    async fn test_batch_scrape_empty_urls() {
        let scraper = scraper();
        let result = batch_scrape_impl(Some(&scraper), 2, BatchScrapeParams::default()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_batch_scrape_invalid_concurrency() {
        let scraper = scraper();
        let params = BatchScrapeParams { urls: vec!["https://x/in/a".into()], max_concurrency: Some(0) };
        assert!(batch_scrape_impl(Some(&scraper), 2, params).await.is_err());
    }

    #[tokio::test]
    async fn test_batch_scrape_without_browser() {
        let params = BatchScrapeParams { urls: vec!["https://x/in/a".into()], max_concurrency: None };
        let err = batch_scrape_impl(None, 2, params).await.unwrap_err();
        assert_eq!(err.code.0, -32011);
    }
}
