//! Remote insight generator client.
//!
//! Sends profile signals to the generator backend and returns the summary and
//! conversation starters it produces.
//!
//! ### Endpoints
//!
//! - `POST /api/1nsyt` with `{name, title, location}`, answering `{data, usage?}`.
//! - `GET /health` answering `{status: "ok"}`.
//!
//! No retries and no backoff. A request timeout is only applied when one is
//! configured; otherwise the transport default holds.

pub mod error;
pub mod request;
pub mod response;

pub use error::GeneratorError;
pub use request::GenerateRequest;
pub use response::{ErrorPayload, GenerateResponse, HealthResponse};

use insyt_core::{AppConfig, GenerationResult, ProfileData};
use reqwest::header;
use std::time::{Duration, Instant};

/// Default base URL of the generator backend.
const DEFAULT_BASE_URL: &str = "http://localhost:3003";

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "insyt/0.1";

/// Produces insights from profile data.
#[async_trait::async_trait]
pub trait Generator: Send + Sync {
    /// Generate a summary and conversation starters for a profile.
    async fn generate(&self, profile: &ProfileData) -> Result<GenerationResult, GeneratorError>;

    /// Probe the backend. Never fails; unreachable means `false`.
    async fn health_check(&self) -> bool;
}

/// Generator client configuration.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Base URL (default: http://localhost:3003).
    pub base_url: String,
    /// Request timeout; `None` leaves the transport default.
    pub timeout: Option<Duration>,
    /// User-agent string (default: insyt/0.x).
    pub user_agent: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_string(), timeout: None, user_agent: DEFAULT_USER_AGENT.to_string() }
    }
}

impl From<&AppConfig> for GeneratorConfig {
    fn from(config: &AppConfig) -> Self {
        Self { base_url: config.api_base_url.clone(), timeout: config.api_timeout(), user_agent: config.user_agent.clone() }
    }
}

/// HTTP client for the generator backend.
#[derive(Debug, Clone)]
pub struct GeneratorClient {
    http: reqwest::Client,
    config: GeneratorConfig,
}

impl GeneratorClient {
    /// Create a new client with the given configuration.
    pub fn new(config: GeneratorConfig) -> Result<Self, GeneratorError> {
        url::Url::parse(&config.base_url)
            .map_err(|e| GeneratorError::InvalidRequest(format!("invalid base URL {}: {e}", config.base_url)))?;

        let mut builder = reqwest::Client::builder().user_agent(&config.user_agent).use_rustls_tls();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self { http, config })
    }

    /// Create a client pointing at `base_url` with default settings.
    pub fn with_url(base_url: impl Into<String>) -> Result<Self, GeneratorError> {
        Self::new(GeneratorConfig { base_url: base_url.into(), ..Default::default() })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait::async_trait]
impl Generator for GeneratorClient {
    async fn generate(&self, profile: &ProfileData) -> Result<GenerationResult, GeneratorError> {
        let req = GenerateRequest::from(profile);

        let start = Instant::now();
        tracing::debug!(name = %req.name, "requesting insight from generator");

        let http_response = self
            .http
            .post(self.endpoint("/api/1nsyt"))
            .header(header::ACCEPT, "application/json")
            .json(&req)
            .send()
            .await?;

        let status = http_response.status();
        let bytes = http_response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorPayload>(&bytes)
                .ok()
                .and_then(ErrorPayload::message);
            tracing::warn!(status = status.as_u16(), ?message, "generator returned an error");
            return Err(match message {
                Some(msg) => GeneratorError::Remote(msg),
                None => GeneratorError::HttpStatus { status: status.as_u16() },
            });
        }

        let body: GenerateResponse =
            serde_json::from_slice(&bytes).map_err(|e| GeneratorError::Parse(e.to_string()))?;

        tracing::info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            starters = body.data.starters.len(),
            usage = ?body.usage,
            "generator returned insight"
        );

        Ok(body.data)
    }

    async fn health_check(&self) -> bool {
        let response = match self.http.get(self.endpoint("/health")).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("generator health check failed: {e}");
                return false;
            }
        };

        match response.json::<HealthResponse>().await {
            Ok(health) => health.status == "ok",
            Err(e) => {
                tracing::warn!("generator health check returned an unreadable body: {e}");
                false
            }
        }
    }
}
