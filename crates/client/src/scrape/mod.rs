//! Background profile scraping in hidden browser views.
//!
//! ### Protocol
//! 1. Open a hidden, non-focused view.
//! 2. Navigate to the profile, bounded by a deadline (10s by default).
//! 3. Wait a short settle delay for client-side rendering (500ms by default).
//! 4. Snapshot the page and run the extraction routine over it.
//! 5. Close the view exactly once, whatever happened in steps 2-4.
//!
//! The browser itself sits behind [`ViewHost`], so the protocol can be driven
//! by `chromiumoxide` in production and by in-memory views in tests.

pub mod batch;
pub mod error;
pub mod extract;

#[cfg(feature = "browser")]
pub mod chromium;

pub use batch::{BatchItem, scrape_many};
pub use error::ScrapeError;
pub use extract::{extract_profile, is_login_redirect};

use std::time::Duration;

use insyt_core::{AppConfig, ScrapedProfile};

/// Rendered state of a view.
#[derive(Debug, Clone, Default)]
pub struct PageSnapshot {
    /// Serialized DOM.
    pub html: String,
    /// Current URL, after redirects.
    pub url: String,
}

/// Whether a view reached load-complete before its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    TimedOut,
}

/// A browser view that is not shown to the user.
#[async_trait::async_trait]
pub trait HiddenView: Send {
    /// Navigate and resolve once the page signals load-complete.
    async fn navigate(&mut self, url: &str) -> Result<(), ScrapeError>;

    /// Capture the current DOM and URL.
    async fn snapshot(&mut self) -> Result<PageSnapshot, ScrapeError>;

    /// Close the view.
    async fn close(&mut self) -> Result<(), ScrapeError>;
}

/// Something that can open hidden views.
#[async_trait::async_trait]
pub trait ViewHost: Send + Sync {
    async fn open_hidden(&self) -> Result<Box<dyn HiddenView>, ScrapeError>;
}

/// Turns a profile URL into scraped profile data.
#[async_trait::async_trait]
pub trait ProfileScraper: Send + Sync {
    async fn scrape(&self, profile_url: &str) -> Result<ScrapedProfile, ScrapeError>;
}

/// Navigate `view` to `url`, waiting at most `deadline` for load-complete.
pub async fn wait_for_load(
    view: &mut dyn HiddenView, url: &str, deadline: Duration,
) -> Result<LoadOutcome, ScrapeError> {
    match tokio::time::timeout(deadline, view.navigate(url)).await {
        Ok(Ok(())) => Ok(LoadOutcome::Loaded),
        Ok(Err(e)) => Err(e),
        Err(_) => Ok(LoadOutcome::TimedOut),
    }
}

/// Timing knobs for a scrape.
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    /// Deadline for load-complete (default: 10s).
    pub timeout: Duration,
    /// Pause between load-complete and extraction (default: 500ms).
    pub settle: Duration,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(10), settle: Duration::from_millis(500) }
    }
}

impl From<&AppConfig> for ScrapeOptions {
    fn from(config: &AppConfig) -> Self {
        Self { timeout: config.scrape_timeout(), settle: config.scrape_settle() }
    }
}

/// Scraper that runs the hidden-view protocol on a [`ViewHost`].
///
/// Every call opens its own view; concurrent calls for the same URL are not
/// deduplicated.
pub struct TabScraper<H> {
    host: H,
    options: ScrapeOptions,
}

impl<H: ViewHost> TabScraper<H> {
    pub fn new(host: H, options: ScrapeOptions) -> Self {
        Self { host, options }
    }

    async fn load_and_extract(&self, view: &mut dyn HiddenView, url: &str) -> Result<ScrapedProfile, ScrapeError> {
        if wait_for_load(view, url, self.options.timeout).await? == LoadOutcome::TimedOut {
            return Err(ScrapeError::Timeout(self.options.timeout.as_millis() as u64));
        }

        tracing::debug!(url, "page loaded, settling before extraction");
        tokio::time::sleep(self.options.settle).await;

        let snapshot = view.snapshot().await?;
        extract_profile(&snapshot.html, &snapshot.url)
    }
}

#[async_trait::async_trait]
impl<H: ViewHost> ProfileScraper for TabScraper<H> {
    async fn scrape(&self, profile_url: &str) -> Result<ScrapedProfile, ScrapeError> {
        if profile_url.trim().is_empty() {
            return Err(ScrapeError::InvalidInput("profile URL cannot be empty".into()));
        }

        tracing::debug!(profile_url, "opening hidden view");
        let mut view = self.host.open_hidden().await?;

        let outcome = self.load_and_extract(view.as_mut(), profile_url).await;

        if let Err(e) = view.close().await {
            tracing::warn!(profile_url, "failed to close hidden view: {e}");
        }

        match &outcome {
            Ok(_) => tracing::info!(profile_url, "scraped profile"),
            Err(e) => tracing::warn!(profile_url, "scrape failed: {e}"),
        }
        outcome
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory views for exercising the protocol.

    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// How a fake view behaves once navigated.
    #[derive(Debug, Clone)]
    pub enum FakePage {
        /// Loads immediately and serves this snapshot.
        Ready { html: String, url: String },
        /// Never signals load-complete.
        Hang,
        /// Navigation itself fails.
        Broken,
    }

    #[derive(Debug, Default)]
    pub struct Counters {
        pub opened: AtomicUsize,
        pub closed: AtomicUsize,
    }

    impl Counters {
        pub fn opened(&self) -> usize {
            self.opened.load(Ordering::SeqCst)
        }

        pub fn closed(&self) -> usize {
            self.closed.load(Ordering::SeqCst)
        }
    }

    pub struct FakeHost {
        pub page: FakePage,
        pub counters: Arc<Counters>,
    }

    impl FakeHost {
        pub fn new(page: FakePage) -> Self {
            Self { page, counters: Arc::new(Counters::default()) }
        }
    }

    struct FakeView {
        page: FakePage,
        counters: Arc<Counters>,
    }

    #[async_trait::async_trait]
    impl ViewHost for FakeHost {
        async fn open_hidden(&self) -> Result<Box<dyn HiddenView>, ScrapeError> {
            self.counters.opened.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(FakeView { page: self.page.clone(), counters: self.counters.clone() }))
        }
    }

    #[async_trait::async_trait]
    impl HiddenView for FakeView {
        async fn navigate(&mut self, _url: &str) -> Result<(), ScrapeError> {
            match self.page {
                FakePage::Ready { .. } => Ok(()),
                FakePage::Hang => std::future::pending().await,
                FakePage::Broken => Err(ScrapeError::Navigation("net::ERR_NAME_NOT_RESOLVED".into())),
            }
        }

        async fn snapshot(&mut self) -> Result<PageSnapshot, ScrapeError> {
            match &self.page {
                FakePage::Ready { html, url } => Ok(PageSnapshot { html: html.clone(), url: url.clone() }),
                _ => Ok(PageSnapshot::default()),
            }
        }

        async fn close(&mut self) -> Result<(), ScrapeError> {
            self.counters.closed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }
}
