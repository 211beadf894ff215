//! Bulk scraping with bounded concurrency.
//!
//! Failures are recorded per item and never stop the rest of the batch.

use std::sync::Arc;

use insyt_core::ScrapedProfile;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use super::{ProfileScraper, ScrapeError};

/// Outcome for one URL of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BatchItem {
    /// The URL as given.
    pub url: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ScrapedProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchItem {
    fn from_outcome(url: String, outcome: Result<ScrapedProfile, ScrapeError>) -> Self {
        match outcome {
            Ok(profile) => Self { url, success: true, data: Some(profile), error: None },
            Err(e) => Self::failed(url, e.to_string()),
        }
    }

    fn failed(url: String, error: String) -> Self {
        Self { url, success: false, data: None, error: Some(error) }
    }
}

/// Scrape every URL with at most `concurrency` scrapes in flight.
///
/// Results come back in input order, one per URL.
pub async fn scrape_many(
    scraper: Arc<dyn ProfileScraper>, urls: Vec<String>, concurrency: usize,
) -> Result<Vec<BatchItem>, ScrapeError> {
    if concurrency == 0 {
        return Err(ScrapeError::InvalidInput("concurrency must be at least 1".into()));
    }

    let semaphore = Arc::new(Semaphore::new(concurrency));
    let mut join_set = JoinSet::new();

    for (index, url) in urls.iter().cloned().enumerate() {
        let semaphore = semaphore.clone();
        let scraper = scraper.clone();

        join_set.spawn(async move {
            let outcome = match semaphore.acquire_owned().await {
                Ok(_permit) => scraper.scrape(&url).await,
                Err(e) => Err(ScrapeError::BrowserUnavailable(e.to_string())),
            };
            (index, BatchItem::from_outcome(url, outcome))
        });
    }

    let mut slots: Vec<Option<BatchItem>> = vec![None; urls.len()];
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((index, item)) => slots[index] = Some(item),
            Err(e) => tracing::error!("scrape task aborted: {e}"),
        }
    }

    let items: Vec<BatchItem> = slots
        .into_iter()
        .zip(urls)
        .map(|(slot, url)| slot.unwrap_or_else(|| BatchItem::failed(url, "scrape task aborted".into())))
        .collect();

    let succeeded = items.iter().filter(|item| item.success).count();
    tracing::info!(total = items.len(), succeeded, failed = items.len() - succeeded, "batch scrape finished");

    Ok(items)
}
