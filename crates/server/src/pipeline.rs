//! Insight orchestration.
//!
//! ```text
//! lookup ─hit──────────────────────────────────────► respond (cached)
//!    └─miss─► enrich (optional) ─► generate ─► save ─► respond (fresh)
//! ```
//!
//! Enrichment failures fall back to the basic profile data. Generation and
//! save failures end the request with `success: false`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use futures_util::future::{BoxFuture, FutureExt, Shared};
use insyt_client::{Generator, ProfileScraper};
use insyt_core::{CacheEntry, Error, GenerationResult, InsightCache, ProfileData, now_millis};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Reply to an insight request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsightResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<GenerationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// True when served from the cache.
    pub cached: bool,
    /// Entry creation time for cache hits, response time otherwise (epoch ms).
    pub timestamp: i64,
}

impl InsightResponse {
    fn from_cache(entry: CacheEntry) -> Self {
        Self {
            success: true,
            data: Some(entry.result),
            error: None,
            cached: true,
            timestamp: entry.metadata.created_at,
        }
    }

    fn fresh(result: GenerationResult) -> Self {
        Self { success: true, data: Some(result), error: None, cached: false, timestamp: now_millis() }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self { success: false, data: None, error: Some(message.into()), cached: false, timestamp: now_millis() }
    }
}

type InFlight = Shared<BoxFuture<'static, InsightResponse>>;
type InFlightMap = Arc<Mutex<HashMap<String, InFlight>>>;

/// Cache, scraper and generator wired together. Cloning shares all three.
#[derive(Clone)]
pub struct Pipeline {
    cache: InsightCache,
    scraper: Option<Arc<dyn ProfileScraper>>,
    generator: Arc<dyn Generator>,
    in_flight: Option<InFlightMap>,
}

impl Pipeline {
    pub fn new(
        cache: InsightCache, generator: Arc<dyn Generator>, scraper: Option<Arc<dyn ProfileScraper>>,
    ) -> Self {
        Self { cache, scraper, generator, in_flight: None }
    }

    /// Let concurrent requests for the same profile share one execution.
    pub fn with_coalescing(mut self, enabled: bool) -> Self {
        self.in_flight = enabled.then(|| Arc::new(Mutex::new(HashMap::new())));
        self
    }

    pub fn cache(&self) -> &InsightCache {
        &self.cache
    }

    pub fn generator(&self) -> &Arc<dyn Generator> {
        &self.generator
    }

    pub fn scraper(&self) -> Option<&Arc<dyn ProfileScraper>> {
        self.scraper.as_ref()
    }

    /// Produce an insight for a profile, from cache or freshly generated.
    pub async fn handle(&self, profile_url: &str, basic: ProfileData) -> InsightResponse {
        if profile_url.trim().is_empty() {
            return InsightResponse::failure("profileUrl is required");
        }

        match &self.in_flight {
            Some(map) => self.handle_coalesced(map, profile_url, basic).await,
            None => self.run(profile_url, basic).await,
        }
    }

    async fn handle_coalesced(&self, map: &InFlightMap, profile_url: &str, basic: ProfileData) -> InsightResponse {
        let (shared, _guard) = {
            let mut in_flight = map.lock().unwrap_or_else(PoisonError::into_inner);
            match in_flight.get(profile_url) {
                Some(shared) => {
                    tracing::debug!(profile_url, "joining in-flight request");
                    (shared.clone(), None)
                }
                None => {
                    let this = self.clone();
                    let url = profile_url.to_string();
                    let shared = async move { this.run(&url, basic).await }.boxed().shared();
                    in_flight.insert(profile_url.to_string(), shared.clone());
                    (shared, Some(InFlightGuard { map: map.clone(), key: profile_url.to_string() }))
                }
            }
        };

        shared.await
    }

    async fn run(&self, profile_url: &str, basic: ProfileData) -> InsightResponse {
        match self.cache.get(profile_url).await {
            Ok(Some(entry)) => return InsightResponse::from_cache(entry),
            Ok(None) => {}
            Err(e) => tracing::warn!(profile_url, "cache lookup failed, treating as miss: {e}"),
        }

        let profile = self.enrich(profile_url, basic).await;

        let result = match self.generator.generate(&profile).await.map_err(Error::from) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(profile_url, "insight generation failed: {e}");
                return InsightResponse::failure(e.to_string());
            }
        };

        if let Err(e) = self.cache.put(profile_url, &profile, &result).await {
            tracing::error!(profile_url, "failed to save insight: {e}");
            return InsightResponse::failure(e.to_string());
        }

        InsightResponse::fresh(result)
    }

    async fn enrich(&self, profile_url: &str, basic: ProfileData) -> ProfileData {
        let Some(scraper) = &self.scraper else {
            return basic;
        };

        match scraper.scrape(profile_url).await.map_err(Error::from) {
            Ok(scraped) => {
                tracing::debug!(profile_url, "enriched profile data");
                basic.merged_with(&scraped)
            }
            Err(e) if e.is_enrichment_failure() => {
                tracing::warn!(profile_url, "enrichment failed, using basic profile data: {e}");
                basic
            }
            Err(e) => {
                tracing::error!(profile_url, "scraper rejected the request, using basic profile data: {e}");
                basic
            }
        }
    }
}

/// Removes the creator's in-flight entry once it finishes or is dropped.
struct InFlightGuard {
    map: InFlightMap,
    key: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.map
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}
