//! In-process cache backend

use crate::cache::entry::CacheEntry;
use crate::cache::traits::{glob_match, Cache, CacheError, CacheResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// A cache held in a process-local map
///
/// Expired entries are dropped lazily when they are read and swept on
/// every write.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.lock()
            .map(|entries| entries.values().filter(|e| !e.is_expired()).count())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> CacheResult<MutexGuard<'_, HashMap<String, CacheEntry>>> {
        self.entries
            .lock()
            .map_err(|_| CacheError::Backend("memory cache lock poisoned".to_string()))
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut entries = self.lock()?;
        let expired = match entries.get(key) {
            Some(entry) if !entry.is_expired() => return Ok(Some(entry.value.clone())),
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> CacheResult<()> {
        let mut entries = self.lock()?;
        entries.retain(|_, entry| !entry.is_expired());
        entries.insert(key.to_string(), CacheEntry::new(value, ttl));
        Ok(())
    }

    async fn delete(&self, pattern: &str) -> CacheResult<usize> {
        let mut entries = self.lock()?;
        let before = entries.len();
        entries.retain(|key, _| !glob_match(pattern, key));
        Ok(before - entries.len())
    }

    async fn ttl(&self, key: &str) -> CacheResult<Option<Duration>> {
        let entries = self.lock()?;
        Ok(entries.get(key).and_then(CacheEntry::remaining))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = MemoryCache::new();
        cache
            .set("facts:1", "value".to_string(), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(cache.get("facts:1").await.unwrap(), Some("value".to_string()));
        assert_eq!(cache.get("facts:2").await.unwrap(), None);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_expired_entry_is_a_miss() {
        let cache = MemoryCache::new();
        cache
            .set("k", "v".to_string(), Duration::ZERO)
            .await
            .unwrap();

        assert_eq!(cache.get("k").await.unwrap(), None);
        assert_eq!(cache.ttl("k").await.unwrap(), None);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_overwrite_replaces_value_and_ttl() {
        let cache = MemoryCache::new();
        cache
            .set("k", "old".to_string(), Duration::from_secs(10))
            .await
            .unwrap();
        cache
            .set("k", "new".to_string(), Duration::from_secs(1000))
            .await
            .unwrap();

        assert_eq!(cache.get("k").await.unwrap(), Some("new".to_string()));
        assert!(cache.ttl("k").await.unwrap().unwrap() > Duration::from_secs(900));
    }

    #[tokio::test]
    async fn test_delete_by_pattern() {
        let cache = MemoryCache::new();
        for key in ["link:a", "link:b", "facts:a"] {
            cache
                .set(key, "v".to_string(), Duration::from_secs(60))
                .await
                .unwrap();
        }

        assert_eq!(cache.delete("link:*").await.unwrap(), 2);
        assert_eq!(cache.get("link:a").await.unwrap(), None);
        assert_eq!(cache.get("facts:a").await.unwrap(), Some("v".to_string()));
    }
}
