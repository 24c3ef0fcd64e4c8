//! A cache that stores nothing

use crate::cache::traits::{Cache, CacheResult};
use async_trait::async_trait;
use std::time::Duration;

/// Cache backend that always misses
///
/// Lets the engine run without a cache service while keeping a single
/// code path: every lookup misses and every write is discarded.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCache;

#[async_trait]
impl Cache for NoopCache {
    async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> CacheResult<()> {
        Ok(())
    }

    async fn delete(&self, _pattern: &str) -> CacheResult<usize> {
        Ok(0)
    }

    async fn ttl(&self, _key: &str) -> CacheResult<Option<Duration>> {
        Ok(None)
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_always_misses() {
        let cache = NoopCache;
        cache
            .set("k", "v".to_string(), Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(cache.get("k").await.unwrap(), None);
        assert_eq!(cache.ttl("k").await.unwrap(), None);
        assert_eq!(cache.delete("*").await.unwrap(), 0);
    }
}
