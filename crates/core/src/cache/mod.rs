//! SQLite-backed storage for cached insights.
//!
//! This module provides a persistent key/value storage area using SQLite
//! with async access via tokio-rusqlite, and the insight cache layered on it:
//!
//! - Namespaced keys (`1nsyt:` + profile URL, stored verbatim)
//! - Automatic schema migrations
//! - WAL mode for concurrent access
//! - Lazy expiry on read plus an explicit sweep

pub mod connection;
pub mod insights;
pub mod key;
pub mod migrations;
pub mod store;

pub use crate::Error;

pub use connection::CacheDb;
pub use insights::InsightCache;
pub use key::{CACHE_PREFIX, cache_key};
pub use store::StoredItem;
