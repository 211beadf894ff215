//! Background scrape error types.

/// Errors that can occur while scraping a profile in a hidden view.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ScrapeError {
    /// The caller passed something unusable (e.g., an empty URL).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No view could be opened.
    #[error("browser unavailable: {0}")]
    BrowserUnavailable(String),

    /// Navigation failed before the page loaded.
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// Timeout waiting for the page to load.
    #[error("page load timeout after {0}ms")]
    Timeout(u64),

    /// The page was redirected to a login screen.
    #[error("not logged in: redirected to {0}")]
    Unauthenticated(String),

    /// The extraction routine produced no result.
    #[error("failed to extract profile data: {0}")]
    ExtractionFailed(String),
}

impl From<ScrapeError> for insyt_core::Error {
    fn from(err: ScrapeError) -> Self {
        match err {
            ScrapeError::InvalidInput(msg) => insyt_core::Error::InvalidInput(msg),
            ScrapeError::BrowserUnavailable(msg) => insyt_core::Error::BrowserUnavailable(msg),
            ScrapeError::Navigation(msg) => insyt_core::Error::ExtractionFailed(format!("navigation failed: {msg}")),
            ScrapeError::Timeout(ms) => insyt_core::Error::ScrapeTimeout(ms),
            ScrapeError::Unauthenticated(url) => insyt_core::Error::UnauthenticatedScrape(url),
            ScrapeError::ExtractionFailed(msg) => insyt_core::Error::ExtractionFailed(msg),
        }
    }
}
