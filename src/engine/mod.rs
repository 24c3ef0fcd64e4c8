//! Analysis engine
//!
//! This module ties the components together:
//! - Fetching the page with the crawler User-Agent
//! - Rendering it statically or headlessly
//! - Extracting the fact-set and checking link health
//! - Caching the result and invalidating it on demand

mod analyzer;
mod fetcher;

pub use analyzer::Analyzer;
pub use fetcher::{build_http_client, FetchedPage, PageFetcher};
