//! Storage schema.
//!
//! The applied schema version is kept in SQLite's `user_version` pragma, so a
//! database file carries its own version without a bookkeeping table.

use super::Error;
use tokio_rusqlite::Connection;

/// Schema steps; step `n` (1-based) brings the store to version `n`.
const STEPS: &[&str] = &[include_str!("../../migrations/001_kv_store.sql")];

/// Schema version a freshly opened store ends up at.
const SCHEMA_VERSION: i64 = STEPS.len() as i64;

/// Bring the store up to [`SCHEMA_VERSION`].
///
/// # Errors
///
/// Returns [`Error::MigrationFailed`] when a step's SQL does not apply.
pub async fn run(conn: &Connection) -> Result<(), Error> {
    conn.call(|conn| -> Result<(), Error> {
        let current: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
        if current >= SCHEMA_VERSION {
            return Ok(());
        }

        for (version, sql) in (1..).zip(STEPS) {
            if version <= current {
                continue;
            }
            conn.execute_batch(sql)
                .map_err(|e| Error::MigrationFailed(format!("step {version}: {e}")))?;
            conn.execute_batch(&format!("PRAGMA user_version = {version}"))?;
            tracing::debug!(version, "storage schema upgraded");
        }

        Ok(())
    })
    .await
    .map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn user_version(conn: &Connection) -> i64 {
        conn.call(|conn| conn.query_row("PRAGMA user_version", [], |row| row.get(0)))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_fresh_store_reaches_current_version() {
        let conn = Connection::open_in_memory().await.unwrap();
        run(&conn).await.unwrap();

        let has_store: bool = conn
            .call(|conn| {
                conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='kv_store')",
                    [],
                    |row| row.get(0),
                )
            })
            .await
            .unwrap();

        assert!(has_store);
        assert_eq!(user_version(&conn).await, SCHEMA_VERSION);
    }

    #[tokio::test]
    async fn test_rerun_keeps_data() {
        let conn = Connection::open_in_memory().await.unwrap();
        run(&conn).await.unwrap();
        conn.call(|conn| conn.execute("INSERT INTO kv_store (key, value, updated_at) VALUES ('k', 'v', '')", []))
            .await
            .unwrap();

        run(&conn).await.unwrap();

        let count: i64 = conn
            .call(|conn| conn.query_row("SELECT COUNT(*) FROM kv_store", [], |row| row.get(0)))
            .await
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(user_version(&conn).await, SCHEMA_VERSION);
    }
}
