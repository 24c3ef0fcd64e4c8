//! Typed, failure-tolerant access to a cache backend

use crate::cache::traits::Cache;
use crate::cache::NoopCache;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// JSON facade over any `Cache` backend
///
/// Backend and decode errors are logged and reported as misses, so cache
/// trouble only ever makes an analysis slower.
#[derive(Clone)]
pub struct CacheFacade {
    backend: Arc<dyn Cache>,
}

impl CacheFacade {
    pub fn new(backend: Arc<dyn Cache>) -> Self {
        Self { backend }
    }

    /// A facade over `NoopCache`
    pub fn disabled() -> Self {
        Self::new(Arc::new(NoopCache))
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Reads and decodes a value
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.backend.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::trace!("Cache miss: {}", key);
                return None;
            }
            Err(e) => {
                tracing::warn!("Cache read failed for {}: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                tracing::debug!("Cache hit: {}", key);
                Some(value)
            }
            Err(e) => {
                tracing::warn!("Discarding undecodable cache entry {}: {}", key, e);
                None
            }
        }
    }

    /// Encodes and stores a value
    pub async fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl: Duration) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Failed to encode cache entry {}: {}", key, e);
                return;
            }
        };

        if let Err(e) = self.backend.set(key, raw, ttl).await {
            tracing::warn!("Cache write failed for {}: {}", key, e);
        }
    }

    /// Deletes keys matching a glob pattern; errors count as nothing deleted
    pub async fn invalidate(&self, pattern: &str) -> usize {
        match self.backend.delete(pattern).await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!("Cache delete failed for {}: {}", pattern, e);
                0
            }
        }
    }

    /// Remaining TTL of a live entry
    pub async fn ttl(&self, key: &str) -> Option<Duration> {
        self.backend.ttl(key).await.ok().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheError, CacheResult, MemoryCache};
    use async_trait::async_trait;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    struct BrokenCache;

    #[async_trait]
    impl Cache for BrokenCache {
        async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
            Err(CacheError::Backend("down".to_string()))
        }
        async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> CacheResult<()> {
            Err(CacheError::Backend("down".to_string()))
        }
        async fn delete(&self, _pattern: &str) -> CacheResult<usize> {
            Err(CacheError::Backend("down".to_string()))
        }
        async fn ttl(&self, _key: &str) -> CacheResult<Option<Duration>> {
            Err(CacheError::Backend("down".to_string()))
        }
        fn name(&self) -> &'static str {
            "broken"
        }
    }

    #[tokio::test]
    async fn test_json_roundtrip() {
        let facade = CacheFacade::new(Arc::new(MemoryCache::new()));
        let sample = Sample {
            name: "a".to_string(),
            count: 3,
        };
        facade.set_json("k", &sample, Duration::from_secs(60)).await;

        assert_eq!(facade.get_json::<Sample>("k").await, Some(sample));
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_a_miss() {
        let backend = Arc::new(MemoryCache::new());
        backend
            .set("k", "not json".to_string(), Duration::from_secs(60))
            .await
            .unwrap();
        let facade = CacheFacade::new(backend);

        assert_eq!(facade.get_json::<Sample>("k").await, None);
    }

    #[tokio::test]
    async fn test_backend_errors_degrade_to_misses() {
        let facade = CacheFacade::new(Arc::new(BrokenCache));
        facade.set_json("k", &1u32, Duration::from_secs(60)).await;

        assert_eq!(facade.get_json::<u32>("k").await, None);
        assert_eq!(facade.invalidate("*").await, 0);
        assert_eq!(facade.ttl("k").await, None);
    }

    #[tokio::test]
    async fn test_disabled_facade() {
        let facade = CacheFacade::disabled();
        facade.set_json("k", &1u32, Duration::from_secs(60)).await;
        assert_eq!(facade.get_json::<u32>("k").await, None);
        assert_eq!(facade.backend_name(), "none");
    }
}
