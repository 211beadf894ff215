//! Generator response payloads.

use insyt_core::{GenerationResult, Usage};
use serde::Deserialize;

/// Success body of `POST /api/1nsyt`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    pub data: GenerationResult,
    #[serde(default)]
    pub usage: Option<Usage>,
}

/// Error body returned with a non-success status.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorPayload {
    /// The backend's message, if it sent a non-empty one.
    pub fn message(self) -> Option<String> {
        self.error.filter(|m| !m.is_empty())
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
