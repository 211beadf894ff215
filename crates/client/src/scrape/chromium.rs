//! Hidden views backed by a Chrome/Chromium instance driven over CDP.

use std::path::PathBuf;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::target::CreateTargetParams;
use chromiumoxide::page::Page;
use futures_util::StreamExt;
use insyt_core::AppConfig;
use tokio::task::JoinHandle;

use super::{HiddenView, PageSnapshot, ScrapeError, ViewHost};

/// Browser launch options.
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    /// Run without a window (default: true).
    pub headless: bool,
    /// Persistent profile directory, so the user's login session carries over.
    pub profile_dir: Option<PathBuf>,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self { headless: true, profile_dir: None }
    }
}

impl From<&AppConfig> for BrowserOptions {
    fn from(config: &AppConfig) -> Self {
        Self { headless: config.browser_headless, profile_dir: config.browser_profile_dir.clone() }
    }
}

/// A launched browser whose tabs serve as hidden views.
pub struct ChromiumHost {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl ChromiumHost {
    /// Launch a browser and start pumping its CDP event stream.
    pub async fn launch(options: &BrowserOptions) -> Result<Self, ScrapeError> {
        let mut builder = BrowserConfig::builder();
        if !options.headless {
            builder = builder.with_head();
        }
        if let Some(dir) = &options.profile_dir {
            builder = builder.user_data_dir(dir);
        }
        let config = builder.build().map_err(ScrapeError::BrowserUnavailable)?;

        let (browser, mut handler) =
            Browser::launch(config).await.map_err(|e| ScrapeError::BrowserUnavailable(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("browser handler event error: {e}");
                    break;
                }
            }
        });

        tracing::info!(headless = options.headless, "browser launched");
        Ok(Self { browser, handler })
    }
}

impl Drop for ChromiumHost {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

#[async_trait::async_trait]
impl ViewHost for ChromiumHost {
    async fn open_hidden(&self) -> Result<Box<dyn HiddenView>, ScrapeError> {
        let mut params = CreateTargetParams::new("about:blank");
        params.background = Some(true);

        let page = self
            .browser
            .new_page(params)
            .await
            .map_err(|e| ScrapeError::BrowserUnavailable(e.to_string()))?;

        Ok(Box::new(ChromiumView { page: Some(page) }))
    }
}

/// A background tab. `None` once closed.
struct ChromiumView {
    page: Option<Page>,
}

impl ChromiumView {
    fn page(&self) -> Result<&Page, ScrapeError> {
        self.page.as_ref().ok_or_else(|| ScrapeError::BrowserUnavailable("view already closed".into()))
    }
}

#[async_trait::async_trait]
impl HiddenView for ChromiumView {
    async fn navigate(&mut self, url: &str) -> Result<(), ScrapeError> {
        self.page()?
            .goto(url)
            .await
            .map_err(|e| ScrapeError::Navigation(e.to_string()))?;
        Ok(())
    }

    async fn snapshot(&mut self) -> Result<PageSnapshot, ScrapeError> {
        let page = self.page()?;
        let html = page
            .content()
            .await
            .map_err(|e| ScrapeError::ExtractionFailed(e.to_string()))?;
        let url = page
            .url()
            .await
            .map_err(|e| ScrapeError::ExtractionFailed(e.to_string()))?
            .unwrap_or_default();

        Ok(PageSnapshot { html, url })
    }

    async fn close(&mut self) -> Result<(), ScrapeError> {
        match self.page.take() {
            Some(page) => page.close().await.map_err(|e| ScrapeError::BrowserUnavailable(e.to_string())),
            None => Ok(()),
        }
    }
}
