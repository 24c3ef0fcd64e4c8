//! Cache trait and error types
//!
//! This module defines the interface every cache backend implements and the
//! errors they can report. Callers go through `CacheFacade`, which turns
//! every error into a miss.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache backend error: {0}")]
    Backend(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cache task failed: {0}")]
    Task(String),
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Key/value store with per-entry TTL
///
/// Keys are namespaced content hashes (see `crate::url::url_cache_key`),
/// values are serialized JSON. Expired entries must never be returned.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Gets a live value
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores a value, replacing any previous entry for the key
    async fn set(&self, key: &str, value: String, ttl: Duration) -> CacheResult<()>;

    /// Deletes every key matching a glob pattern (`*` matches any run of
    /// characters), returning how many entries were removed
    async fn delete(&self, pattern: &str) -> CacheResult<usize>;

    /// Remaining time to live of a live entry
    async fn ttl(&self, key: &str) -> CacheResult<Option<Duration>>;

    /// Short backend name for logs
    fn name(&self) -> &'static str;
}

/// Matches a key against a glob pattern where `*` matches any run of characters
pub fn glob_match(pattern: &str, key: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();

    if parts.len() == 1 {
        return pattern == key;
    }

    let (first, rest) = (parts[0], &parts[1..]);
    let Some(mut remaining) = key.strip_prefix(first) else {
        return false;
    };

    let last = rest[rest.len() - 1];
    for middle in &rest[..rest.len() - 1] {
        match remaining.find(middle) {
            Some(pos) => remaining = &remaining[pos + middle.len()..],
            None => return false,
        }
    }

    remaining.ends_with(last)
}
