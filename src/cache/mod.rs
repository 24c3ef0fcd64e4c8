//! Cache module
//!
//! Every expensive step of an analysis is memoized here:
//! - Site profiles, keyed by domain hash
//! - Rendered pages, keyed by URL hash
//! - Extracted fact-sets, keyed by URL hash
//! - Link check outcomes, keyed by URL hash with a TTL per outcome class
//!
//! Backends implement the `Cache` trait; the engine talks to them through
//! `CacheFacade`, which never fails.

mod entry;
mod facade;
mod memory;
mod noop;
mod sqlite;
mod traits;

pub use entry::CacheEntry;
pub use facade::CacheFacade;
pub use memory::MemoryCache;
pub use noop::NoopCache;
pub use sqlite::SqliteCache;
pub use traits::{glob_match, Cache, CacheError, CacheResult};

use crate::config::{CacheBackend, CacheConfig};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Key namespace for site profiles
pub const PROFILE_NAMESPACE: &str = "profile";

/// Key namespace for rendered pages
pub const RENDER_NAMESPACE: &str = "rendered";

/// Key namespace for extracted fact-sets
pub const FACTS_NAMESPACE: &str = "facts";

/// Key namespace for link check outcomes
pub const LINK_NAMESPACE: &str = "link";

/// Time to live for each class of cache entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtls {
    pub profile: Duration,
    pub render: Duration,
    pub facts: Duration,
    pub link_ok: Duration,
    pub link_error: Duration,
}

impl From<&CacheConfig> for CacheTtls {
    fn from(config: &CacheConfig) -> Self {
        Self {
            profile: Duration::from_secs(config.profile_ttl_secs),
            render: Duration::from_secs(config.render_ttl_secs),
            facts: Duration::from_secs(config.facts_ttl_secs),
            link_ok: Duration::from_secs(config.link_ok_ttl_secs),
            link_error: Duration::from_secs(config.link_error_ttl_secs),
        }
    }
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self::from(&CacheConfig::default())
    }
}

/// Builds the configured cache backend
///
/// # Returns
///
/// * `Ok(Arc<dyn Cache>)` - The backend
/// * `Err(CacheError)` - The SQLite database could not be opened
pub fn build_cache(config: &CacheConfig) -> CacheResult<Arc<dyn Cache>> {
    let cache: Arc<dyn Cache> = match config.backend {
        CacheBackend::Memory => Arc::new(MemoryCache::new()),
        CacheBackend::None => Arc::new(NoopCache),
        CacheBackend::Sqlite => {
            let path = config
                .path
                .as_deref()
                .ok_or_else(|| CacheError::Backend("sqlite cache path missing".to_string()))?;
            Arc::new(SqliteCache::open(Path::new(path))?)
        }
    };

    tracing::debug!("Using {} cache backend", cache.name());
    Ok(cache)
}
