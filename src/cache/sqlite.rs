//! SQLite cache backend
//!
//! Persists entries in a single table so cached profiles, renders and link
//! results survive across CLI runs. Blocking SQLite calls run on tokio's
//! blocking pool.

use crate::cache::traits::{glob_match, Cache, CacheError, CacheResult};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// SQL schema for the cache database
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS cache_entries (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    stored_at INTEGER NOT NULL,
    expires_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_cache_entries_expires ON cache_entries(expires_at);
"#;

/// Deletes every expired row, returning how many were removed
fn purge_expired(conn: &Connection) -> rusqlite::Result<usize> {
    let now = Utc::now().timestamp_millis();
    conn.execute(
        "DELETE FROM cache_entries WHERE expires_at <= ?1",
        params![now],
    )
}

/// SQLite-backed cache
///
/// Expired rows are swept when the database is opened and on every write.
#[derive(Clone)]
pub struct SqliteCache {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteCache {
    /// Opens or creates a cache database at `path`
    pub fn open(path: &Path) -> CacheResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;
        conn.execute_batch(SCHEMA_SQL)?;

        let purged = purge_expired(&conn)?;
        if purged > 0 {
            tracing::debug!("Purged {} expired cache rows from {}", purged, path.display());
        }

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Creates an in-memory database (for testing)
    pub fn open_in_memory() -> CacheResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_conn<T, F>(&self, f: F) -> CacheResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> CacheResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| CacheError::Backend("sqlite cache lock poisoned".to_string()))?;
            f(&guard)
        })
        .await
        .map_err(|e| CacheError::Task(e.to_string()))?
    }
}

#[async_trait]
impl Cache for SqliteCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let key = key.to_string();
        self.with_conn(move |conn| {
            let now = Utc::now().timestamp_millis();
            let value = conn
                .query_row(
                    "SELECT value FROM cache_entries WHERE key = ?1 AND expires_at > ?2",
                    params![key, now],
                    |row| row.get::<_, String>(0),
                )
                .optional()?;
            Ok(value)
        })
        .await
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> CacheResult<()> {
        let key = key.to_string();
        self.with_conn(move |conn| {
            purge_expired(conn)?;

            let now = Utc::now().timestamp_millis();
            let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
            let expires_at = now.saturating_add(ttl_ms);
            conn.execute(
                "INSERT INTO cache_entries (key, value, stored_at, expires_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    stored_at = excluded.stored_at,
                    expires_at = excluded.expires_at",
                params![key, value, now, expires_at],
            )?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, pattern: &str) -> CacheResult<usize> {
        let pattern = pattern.to_string();
        self.with_conn(move |conn| {
            let keys: Vec<String> = {
                let mut stmt = conn.prepare("SELECT key FROM cache_entries")?;
                let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
                let keys = rows.collect::<Result<Vec<_>, _>>()?;
                keys
            };

            let mut removed = 0;
            for key in keys.iter().filter(|k| glob_match(&pattern, k)) {
                removed += conn.execute("DELETE FROM cache_entries WHERE key = ?1", params![key])?;
            }
            Ok(removed)
        })
        .await
    }

    async fn ttl(&self, key: &str) -> CacheResult<Option<Duration>> {
        let key = key.to_string();
        self.with_conn(move |conn| {
            let now = Utc::now().timestamp_millis();
            let expires_at = conn
                .query_row(
                    "SELECT expires_at FROM cache_entries WHERE key = ?1",
                    params![key],
                    |row| row.get::<_, i64>(0),
                )
                .optional()?;

            Ok(expires_at
                .filter(|&at| at > now)
                .map(|at| Duration::from_millis((at - now) as u64)))
        })
        .await
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }
}
