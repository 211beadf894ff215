//! MCP tool implementations.
//!
//! This module contains all tools exposed by the insyt host.

pub mod batch_scrape;
pub mod cache;
pub mod health;
pub mod insight;

pub use batch_scrape::{BatchScrapeParams, batch_scrape_impl};
pub use health::health_impl;
pub use insight::{GetInsightParams, insight_impl};
