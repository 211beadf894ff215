//! Client code for insyt.
//!
//! This crate provides the remote generator client, the background profile
//! scraper and the HTML extraction it relies on.

pub mod generator;
pub mod scrape;

pub use generator::{Generator, GeneratorClient, GeneratorConfig, GeneratorError};
pub use scrape::{
    BatchItem, HiddenView, LoadOutcome, PageSnapshot, ProfileScraper, ScrapeError, ScrapeOptions, TabScraper,
    ViewHost, extract_profile, scrape_many, wait_for_load,
};

#[cfg(feature = "browser")]
pub use scrape::chromium::{BrowserOptions, ChromiumHost};
