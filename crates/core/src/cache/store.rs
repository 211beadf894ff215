//! Key/value storage area.
//!
//! A flat map of string keys to JSON documents. Namespacing is done by key
//! prefix; prefix matches are exact and case-sensitive.

use super::connection::CacheDb;
use crate::Error;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// A raw stored item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredItem {
    pub key: String,
    pub value: String,
}

impl CacheDb {
    /// Insert or overwrite a value.
    pub async fn set_item(&self, key: &str, value: &str) -> Result<(), Error> {
        let key = key.to_string();
        let value = value.to_string();
        let updated_at = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
                    ON CONFLICT(key) DO UPDATE SET
                        value = excluded.value,
                        updated_at = excluded.updated_at",
                    params![key, value, updated_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Get a value by key.
    ///
    /// Returns None if the key doesn't exist.
    pub async fn get_item(&self, key: &str) -> Result<Option<String>, Error> {
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<Option<String>, Error> {
                let result = conn.query_row("SELECT value FROM kv_store WHERE key = ?1", params![key], |row| row.get(0));

                match result {
                    Ok(value) => Ok(Some(value)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Delete the given keys. Missing keys are ignored.
    ///
    /// Returns the number of deleted entries.
    pub async fn remove_items(&self, keys: Vec<String>) -> Result<u64, Error> {
        if keys.is_empty() {
            return Ok(0);
        }
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let mut stmt = conn.prepare("DELETE FROM kv_store WHERE key = ?1")?;
                let mut deleted = 0u64;
                for key in &keys {
                    deleted += stmt.execute(params![key])? as u64;
                }
                Ok(deleted)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete every key starting with `prefix`.
    ///
    /// Returns the number of deleted entries.
    pub async fn remove_prefix(&self, prefix: &str) -> Result<u64, Error> {
        let prefix = prefix.to_string();
        let len = prefix.chars().count() as i64;
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM kv_store WHERE substr(key, 1, ?2) = ?1", params![prefix, len])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// All items whose key starts with `prefix`, ordered by key.
    pub async fn items_with_prefix(&self, prefix: &str) -> Result<Vec<StoredItem>, Error> {
        let prefix = prefix.to_string();
        let len = prefix.chars().count() as i64;
        self.conn
            .call(move |conn| -> Result<Vec<StoredItem>, Error> {
                let mut stmt =
                    conn.prepare("SELECT key, value FROM kv_store WHERE substr(key, 1, ?2) = ?1 ORDER BY key")?;
                let rows = stmt.query_map(params![prefix, len], |row| {
                    Ok(StoredItem { key: row.get(0)?, value: row.get(1)? })
                })?;

                let mut items = Vec::new();
                for row in rows {
                    items.push(row?);
                }
                Ok(items)
            })
            .await
            .map_err(Error::from)
    }

    /// Approximate bytes used by the whole storage area (keys plus values).
    pub async fn estimated_size(&self) -> Result<u64, Error> {
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let size: i64 = conn.query_row(
                    "SELECT COALESCE(SUM(length(CAST(key AS BLOB)) + length(CAST(value AS BLOB))), 0) FROM kv_store",
                    [],
                    |row| row.get(0),
                )?;
                Ok(size.max(0) as u64)
            })
            .await
            .map_err(Error::from)
    }
}
