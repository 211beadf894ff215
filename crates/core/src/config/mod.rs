//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (INSYT_*)
//! 2. TOML config file (if INSYT_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// How the host talks to its caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Browser native messaging: length-prefixed JSON on stdio.
    #[default]
    Native,
    /// Model Context Protocol tools on stdio.
    Mcp,
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (INSYT_*)
/// 2. TOML config file (if INSYT_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to SQLite storage database.
    ///
    /// Set via INSYT_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Base URL of the generator backend.
    ///
    /// Set via INSYT_API_BASE_URL environment variable.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Optional request timeout for generator calls in milliseconds.
    ///
    /// Unset means the HTTP client's default (no timeout).
    #[serde(default)]
    pub api_timeout_ms: Option<u64>,

    /// User-Agent string for generator requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Lifetime of a cached insight in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Upper bound on a hidden view's page load in milliseconds.
    #[serde(default = "default_scrape_timeout_ms")]
    pub scrape_timeout_ms: u64,

    /// Pause after load-complete before extracting, in milliseconds.
    #[serde(default = "default_scrape_settle_ms")]
    pub scrape_settle_ms: u64,

    /// Number of simultaneous hidden views for bulk scraping.
    #[serde(default = "default_scrape_concurrency")]
    pub scrape_concurrency: usize,

    /// Whether background scraping is available at all.
    ///
    /// Set via INSYT_BROWSER_ENABLED environment variable.
    #[serde(default = "default_true")]
    pub browser_enabled: bool,

    /// Run the browser without a window.
    #[serde(default = "default_true")]
    pub browser_headless: bool,

    /// Persistent browser profile, so an existing login session is reused.
    #[serde(default)]
    pub browser_profile_dir: Option<PathBuf>,

    /// Let concurrent requests for one profile share a single execution.
    #[serde(default)]
    pub coalesce_requests: bool,

    /// Caller protocol.
    #[serde(default)]
    pub transport: Transport,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./insyt-cache.sqlite")
}

fn default_api_base_url() -> String {
    "http://localhost:3003".into()
}

fn default_user_agent() -> String {
    "insyt/0.1".into()
}

fn default_cache_ttl_secs() -> u64 {
    7 * 24 * 60 * 60
}

fn default_scrape_timeout_ms() -> u64 {
    10_000
}

fn default_scrape_settle_ms() -> u64 {
    500
}

fn default_scrape_concurrency() -> usize {
    2
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            api_base_url: default_api_base_url(),
            api_timeout_ms: None,
            user_agent: default_user_agent(),
            cache_ttl_secs: default_cache_ttl_secs(),
            scrape_timeout_ms: default_scrape_timeout_ms(),
            scrape_settle_ms: default_scrape_settle_ms(),
            scrape_concurrency: default_scrape_concurrency(),
            browser_enabled: true,
            browser_headless: true,
            browser_profile_dir: None,
            coalesce_requests: false,
            transport: Transport::Native,
        }
    }
}

impl AppConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn scrape_timeout(&self) -> Duration {
        Duration::from_millis(self.scrape_timeout_ms)
    }

    pub fn scrape_settle(&self) -> Duration {
        Duration::from_millis(self.scrape_settle_ms)
    }

    pub fn api_timeout(&self) -> Option<Duration> {
        self.api_timeout_ms.map(Duration::from_millis)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `INSYT_`
    /// 2. TOML file from `INSYT_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("INSYT_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("INSYT_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
