//! Configuration module for Seoscope
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use seoscope::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("seoscope.toml")).unwrap();
//! println!("Link checks in flight: {}", config.links.batch_size);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CacheBackend, CacheConfig, Config, HttpConfig, LinkCheckConfig, RendererConfig,
    UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
