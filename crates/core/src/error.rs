//! Unified error types for insyt.
//!
//! Every layer converts into [`Error`] before crossing into the host, where it
//! is flattened to a single message string or an MCP error code.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

/// Unified error types for the insyt host.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty profile URL).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Storage operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// A stored value could not be encoded or decoded.
    #[error("CACHE_ERROR: corrupt entry: {0}")]
    Codec(String),

    /// The hidden view did not finish loading in time.
    #[error("SCRAPE_TIMEOUT: page load exceeded {0}ms")]
    ScrapeTimeout(u64),

    /// The extraction routine produced no result.
    #[error("EXTRACTION_FAILED: {0}")]
    ExtractionFailed(String),

    /// The profile page redirected to a login screen.
    #[error("UNAUTHENTICATED: {0}")]
    UnauthenticatedScrape(String),

    /// No browser is available to host hidden views.
    #[error("BROWSER_UNAVAILABLE: {0}")]
    BrowserUnavailable(String),

    /// The generator backend could not be reached.
    #[error("TRANSPORT_ERROR: {0}")]
    Transport(String),

    /// The generator backend reported an error message.
    #[error("{0}")]
    Remote(String),

    /// The generator backend failed without a readable error payload.
    #[error("API error: {0}")]
    HttpStatus(u16),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Codec(err.to_string())
    }
}

impl Error {
    /// True for failures of the optional enrichment step.
    pub fn is_enrichment_failure(&self) -> bool {
        matches!(
            self,
            Error::ScrapeTimeout(_)
                | Error::ExtractionFailed(_)
                | Error::UnauthenticatedScrape(_)
                | Error::BrowserUnavailable(_)
        )
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::Database(e) => (-32002, e.to_string()),
            Error::MigrationFailed(msg) => (-32002, msg.clone()),
            Error::Codec(msg) => (-32002, msg.clone()),
            Error::ScrapeTimeout(ms) => (-32006, format!("page load exceeded {ms}ms")),
            Error::ExtractionFailed(msg) => (-32000, msg.clone()),
            Error::UnauthenticatedScrape(msg) => (-32009, msg.clone()),
            Error::BrowserUnavailable(msg) => (-32011, msg.clone()),
            Error::Transport(msg) => (-32008, msg.clone()),
            Error::Remote(msg) => (-32010, msg.clone()),
            Error::HttpStatus(status) => (-32008, format!("API error: {status}")),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
