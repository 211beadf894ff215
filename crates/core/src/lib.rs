//! Core types and shared functionality for insyt.
//!
//! This crate provides:
//! - Key/value storage with SQLite backend and the insight cache on top of it
//! - Unified error types
//! - Configuration structures
//! - Profile and generation records shared by client and host

pub mod cache;
pub mod config;
pub mod error;
pub mod types;

pub use cache::{CacheDb, InsightCache};
pub use config::{AppConfig, ConfigError, Transport};
pub use error::Error;
pub use types::{CacheEntry, CacheMetadata, CacheStats, GenerationResult, ProfileData, ScrapedProfile, Usage, now_millis};
