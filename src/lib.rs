//! Seoscope: an adaptive page analysis engine for SEO audits
//!
//! This crate fetches a page, decides whether it needs headless rendering,
//! extracts a structured fact-set from the resolved document, checks link
//! health with bounded concurrency, and scores the result. Every expensive
//! step is memoized behind a cache with per-entry TTLs.

pub mod cache;
pub mod checker;
pub mod config;
pub mod detector;
pub mod engine;
pub mod extract;
pub mod output;
pub mod renderer;
pub mod score;
pub mod url;

use thiserror::Error;

/// Main error type for Seoscope operations
///
/// Only the variants describing an unreachable or unusable target are ever
/// returned from an analysis run. Render, extraction, link-check and cache
/// failures are recovered where they happen.
#[derive(Debug, Error)]
pub enum SeoscopeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to fetch {url}: {source}")]
    FetchFailed { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} returned for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Cache error: {0}")]
    Cache(#[from] cache::CacheError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid host pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Result type alias for Seoscope operations
pub type Result<T> = std::result::Result<T, SeoscopeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use detector::{detect, SiteProfile};
pub use engine::Analyzer;
pub use extract::{extract, ScrapedFactSet};
pub use score::{score, ScoreReport};
