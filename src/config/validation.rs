use crate::config::types::{
    CacheBackend, CacheConfig, Config, HttpConfig, LinkCheckConfig, RendererConfig,
    UserAgentConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_user_agent_config(&config.user_agent)?;
    validate_http_config(&config.http)?;
    validate_renderer_config(&config.renderer)?;
    validate_link_config(&config.links)?;
    validate_cache_config(&config.cache)?;
    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "http timeout_secs must be >= 1".to_string(),
        ));
    }
    Ok(())
}

fn validate_renderer_config(config: &RendererConfig) -> Result<(), ConfigError> {
    if config.content_wait_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "content_wait_ms must be >= 100ms, got {}ms",
            config.content_wait_ms
        )));
    }

    if !(config.sparse_ratio > 0.0 && config.sparse_ratio < 1.0) {
        return Err(ConfigError::Validation(format!(
            "sparse_ratio must be between 0 and 1 (exclusive), got {}",
            config.sparse_ratio
        )));
    }

    for pattern in &config.blocked_hosts {
        validate_host_pattern(pattern)?;
    }

    Ok(())
}

fn validate_link_config(config: &LinkCheckConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "link timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.batch_size < 1 || config.batch_size > 500 {
        return Err(ConfigError::Validation(format!(
            "batch_size must be between 1 and 500, got {}",
            config.batch_size
        )));
    }

    Ok(())
}

fn validate_cache_config(config: &CacheConfig) -> Result<(), ConfigError> {
    if config.backend == CacheBackend::Sqlite
        && config.path.as_deref().map_or(true, str::is_empty)
    {
        return Err(ConfigError::Validation(
            "cache path is required for the sqlite backend".to_string(),
        ));
    }

    // Failures must be re-checked sooner than successes.
    if config.link_error_ttl_secs > config.link_ok_ttl_secs {
        return Err(ConfigError::Validation(format!(
            "link_error_ttl_secs ({}) cannot exceed link_ok_ttl_secs ({})",
            config.link_error_ttl_secs, config.link_ok_ttl_secs
        )));
    }

    Ok(())
}

/// Validates a host pattern (supports a leading `*.` wildcard)
fn validate_host_pattern(pattern: &str) -> Result<(), ConfigError> {
    let domain = pattern.strip_prefix("*.").unwrap_or(pattern);

    if domain.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Host pattern cannot be empty".to_string(),
        ));
    }

    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Host '{}' contains invalid characters",
            domain
        )));
    }

    if domain.starts_with('.') || domain.ends_with('.') || domain.contains("..") {
        return Err(ConfigError::InvalidPattern(format!(
            "Host '{}' has misplaced dots",
            domain
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::InvalidPattern(format!(
            "Host '{}' must contain at least one dot (e.g., 'example.com')",
            domain
        )));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
