//! Insight cache with time-based expiry.
//!
//! Entries live under the [`CACHE_PREFIX`] namespace of the storage area and
//! expire `ttl` after they were written. Expired entries are removed lazily
//! on read, or in bulk by [`InsightCache::sweep_expired`].

use std::time::Duration;

use super::connection::CacheDb;
use super::key::{CACHE_PREFIX, cache_key};
use crate::Error;
use crate::types::{CacheEntry, CacheMetadata, CacheStats, GenerationResult, ProfileData, now_millis};

/// Cached insights keyed by profile URL.
#[derive(Clone, Debug)]
pub struct InsightCache {
    db: CacheDb,
    ttl_ms: i64,
    version: String,
}

impl InsightCache {
    pub fn new(db: CacheDb, ttl: Duration) -> Self {
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        Self { db, ttl_ms, version: env!("CARGO_PKG_VERSION").to_string() }
    }

    /// Override the version recorded in entry metadata.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn db(&self) -> &CacheDb {
        &self.db
    }

    pub fn ttl_ms(&self) -> i64 {
        self.ttl_ms
    }

    /// Store an insight, replacing any previous entry for the profile.
    pub async fn put(
        &self, profile_url: &str, profile: &ProfileData, result: &GenerationResult,
    ) -> Result<CacheEntry, Error> {
        self.put_at(profile_url, profile, result, now_millis()).await
    }

    /// [`put`](Self::put) with an explicit creation time (epoch ms).
    pub async fn put_at(
        &self, profile_url: &str, profile: &ProfileData, result: &GenerationResult, now: i64,
    ) -> Result<CacheEntry, Error> {
        let entry = CacheEntry {
            profile_data: profile.clone(),
            result: result.clone(),
            metadata: CacheMetadata {
                cached: true,
                created_at: now,
                expires_at: now.saturating_add(self.ttl_ms),
                schema_version: self.version.clone(),
            },
        };

        let json = serde_json::to_string(&entry)?;
        self.db.set_item(&cache_key(profile_url), &json).await?;
        tracing::info!(profile_url, expires_at = entry.metadata.expires_at, "cached insight");

        Ok(entry)
    }

    /// Look up a fresh insight.
    ///
    /// An expired entry is deleted and reported as absent.
    pub async fn get(&self, profile_url: &str) -> Result<Option<CacheEntry>, Error> {
        self.get_at(profile_url, now_millis()).await
    }

    /// [`get`](Self::get) evaluated at an explicit time (epoch ms).
    pub async fn get_at(&self, profile_url: &str, now: i64) -> Result<Option<CacheEntry>, Error> {
        let key = cache_key(profile_url);
        let Some(raw) = self.db.get_item(&key).await? else {
            tracing::debug!(profile_url, "cache miss");
            return Ok(None);
        };

        let entry: CacheEntry = serde_json::from_str(&raw)?;

        if entry.is_expired_at(now) {
            tracing::debug!(profile_url, expires_at = entry.metadata.expires_at, "cache entry expired");
            self.db.remove_items(vec![key]).await?;
            return Ok(None);
        }

        tracing::debug!(profile_url, "cache hit");
        Ok(Some(entry))
    }

    /// Remove the entry for a profile if there is one.
    pub async fn invalidate(&self, profile_url: &str) -> Result<(), Error> {
        let deleted = self.db.remove_items(vec![cache_key(profile_url)]).await?;
        tracing::info!(profile_url, deleted, "invalidated insight");
        Ok(())
    }

    /// Remove every cached insight, leaving other namespaces alone.
    ///
    /// Returns the number of deleted entries.
    pub async fn clear_all(&self) -> Result<u64, Error> {
        let deleted = self.db.remove_prefix(CACHE_PREFIX).await?;
        tracing::info!(deleted, "cleared insight cache");
        Ok(deleted)
    }

    /// Remove entries whose expiry lies in the past.
    ///
    /// Entries that cannot be decoded are kept. Returns the number of deleted entries.
    pub async fn sweep_expired(&self) -> Result<u64, Error> {
        self.sweep_expired_at(now_millis()).await
    }

    /// [`sweep_expired`](Self::sweep_expired) evaluated at an explicit time (epoch ms).
    pub async fn sweep_expired_at(&self, now: i64) -> Result<u64, Error> {
        let mut expired = Vec::new();
        for item in self.db.items_with_prefix(CACHE_PREFIX).await? {
            match serde_json::from_str::<CacheEntry>(&item.value) {
                Ok(entry) if entry.metadata.expires_at < now => expired.push(item.key),
                Ok(_) => {}
                Err(e) => tracing::warn!(key = %item.key, "skipping undecodable cache entry: {e}"),
            }
        }

        let deleted = self.db.remove_items(expired).await?;
        if deleted > 0 {
            tracing::info!(deleted, "swept expired insights");
        }
        Ok(deleted)
    }

    /// Count, size and age range of cached insights.
    pub async fn stats(&self) -> Result<CacheStats, Error> {
        let items = self.db.items_with_prefix(CACHE_PREFIX).await?;
        if items.is_empty() {
            return Ok(CacheStats::default());
        }

        let created: Vec<i64> = items
            .iter()
            .filter_map(|item| serde_json::from_str::<CacheEntry>(&item.value).ok())
            .map(|entry| entry.metadata.created_at)
            .collect();

        Ok(CacheStats {
            count: items.len() as u64,
            estimated_size: self.db.estimated_size().await?,
            oldest: created.iter().min().copied(),
            newest: created.iter().max().copied(),
        })
    }
}
