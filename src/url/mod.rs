//! URL handling module for Seoscope
//!
//! This module provides URL normalization, cache-key hashing, href
//! resolution, host pattern matching, and internal/external link
//! classification.

mod domain;
mod matcher;
mod normalize;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use url::Url;

// Re-export main functions
pub use domain::{extract_domain, same_site};
pub use matcher::{matches_host_pattern, HostMatcher};
pub use normalize::{normalize_url, parse_page_url};

/// Href prefixes that never point at a fetchable document
const NON_FETCHABLE_PREFIXES: &[&str] = &["javascript:", "mailto:", "tel:", "data:", "#"];

/// Whether a link stays on the analyzed site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkScope {
    Internal,
    External,
}

/// Classifies a resolved link against the page's own host
///
/// # Examples
///
/// ```
/// use url::Url;
/// use seoscope::url::{classify_link, LinkScope};
///
/// let page = Url::parse("https://example.com/blog").unwrap();
/// let about = page.join("/about").unwrap();
/// let other = Url::parse("https://other.com").unwrap();
///
/// assert_eq!(classify_link(&about, &page), LinkScope::Internal);
/// assert_eq!(classify_link(&other, &page), LinkScope::External);
/// ```
pub fn classify_link(link: &Url, page: &Url) -> LinkScope {
    match (link.host_str(), page.host_str()) {
        (Some(link_host), Some(page_host)) if same_site(link_host, page_host) => {
            LinkScope::Internal
        }
        _ => LinkScope::External,
    }
}

/// Resolves an href against the page URL
///
/// Returns `None` for empty hrefs, fragment-only anchors, `javascript:`,
/// `mailto:`, `tel:` and `data:` links, and anything that does not resolve
/// to an HTTP(S) URL.
pub fn resolve_href(href: &str, base: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if NON_FETCHABLE_PREFIXES.iter().any(|p| lower.starts_with(p)) {
        return None;
    }

    base.join(href)
        .ok()
        .filter(|url| url.scheme() == "http" || url.scheme() == "https")
}

/// Returns true if a URL string is something the link checker should probe
pub fn is_checkable(url: &str) -> bool {
    let lower = url.trim().to_ascii_lowercase();
    (lower.starts_with("http://") || lower.starts_with("https://")) && Url::parse(url).is_ok()
}

/// Hex SHA-256 of a string
pub fn hash_str(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Cache key for a URL-scoped entry: `<namespace>:<sha256 of normalized URL>`
///
/// Falls back to hashing the trimmed raw input when it cannot be normalized,
/// so the key is still bounded in length.
pub fn url_cache_key(namespace: &str, url: &str) -> String {
    let canonical = normalize_url(url)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| url.trim().to_string());
    format!("{}:{}", namespace, hash_str(&canonical))
}

/// Cache key for an entry scoped to one exact URL
///
/// Only scheme and host casing, default ports and the fragment are
/// normalized away. Path, trailing slash and query are kept verbatim, so
/// `/a` and `/a/` get separate entries.
pub fn exact_url_cache_key(namespace: &str, url: &str) -> String {
    let canonical = match Url::parse(url.trim()) {
        Ok(mut parsed) => {
            parsed.set_fragment(None);
            parsed.to_string()
        }
        Err(_) => url.trim().to_string(),
    };
    format!("{}:{}", namespace, hash_str(&canonical))
}

/// Cache key for a domain-scoped entry: `<namespace>:<sha256 of lowercase domain>`
pub fn domain_cache_key(namespace: &str, domain: &str) -> String {
    format!("{}:{}", namespace, hash_str(&domain.trim().to_lowercase()))
}
