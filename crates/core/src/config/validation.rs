//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `api_base_url` is not an http(s) URL
    /// - `user_agent` is empty
    /// - `cache_ttl_secs` is 0
    /// - `scrape_timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `scrape_settle_ms` is not shorter than the scrape timeout
    /// - `scrape_concurrency` is outside 1..=16
    pub fn validate(&self) -> Result<(), ConfigError> {
        match url::Url::parse(&self.api_base_url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(_) => return Err(invalid("api_base_url", "scheme must be http or https")),
            Err(e) => return Err(invalid("api_base_url", &e.to_string())),
        }

        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }

        if self.cache_ttl_secs == 0 {
            return Err(invalid("cache_ttl_secs", "must be at least 1 second"));
        }

        if self.scrape_timeout_ms < 100 {
            return Err(invalid("scrape_timeout_ms", "must be at least 100ms"));
        }
        if self.scrape_timeout_ms > 300_000 {
            return Err(invalid("scrape_timeout_ms", "must not exceed 5 minutes (300000ms)"));
        }

        if self.scrape_settle_ms >= self.scrape_timeout_ms {
            return Err(invalid("scrape_settle_ms", "must be shorter than scrape_timeout_ms"));
        }

        if self.scrape_concurrency == 0 || self.scrape_concurrency > 16 {
            return Err(invalid("scrape_concurrency", "must be between 1 and 16"));
        }

        if self.api_timeout_ms.is_none() {
            tracing::debug!("api_timeout_ms unset; generator requests use the transport default");
        }

        if !self.browser_enabled && self.browser_profile_dir.is_some() {
            tracing::warn!("browser_profile_dir is set but browser_enabled is false; enrichment is off");
        }

        Ok(())
    }
}
