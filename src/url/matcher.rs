use url::Url;

/// Checks if a host matches a pattern
///
/// Two pattern forms are supported:
/// 1. Exact: `"example.com"` matches only `example.com`
/// 2. Wildcard: `"*.example.com"` matches `example.com` and any subdomain
///
/// Comparison is case-insensitive.
///
/// # Examples
///
/// ```
/// use seoscope::url::matches_host_pattern;
///
/// assert!(matches_host_pattern("*.doubleclick.net", "stats.g.doubleclick.net"));
/// assert!(matches_host_pattern("*.doubleclick.net", "DOUBLECLICK.NET"));
/// assert!(!matches_host_pattern("*.doubleclick.net", "notdoubleclick.net"));
/// ```
pub fn matches_host_pattern(pattern: &str, host: &str) -> bool {
    let pattern = pattern.to_ascii_lowercase();
    let host = host.to_ascii_lowercase();

    match pattern.strip_prefix("*.") {
        Some(base) => host == base || host.ends_with(&format!(".{}", base)),
        None => host == pattern,
    }
}

/// A set of host patterns checked against request URLs
///
/// Used by headless sessions to abort requests to tracking hosts.
#[derive(Debug, Clone, Default)]
pub struct HostMatcher {
    patterns: Vec<String>,
}

impl HostMatcher {
    pub fn new(patterns: &[String]) -> Self {
        Self {
            patterns: patterns.to_vec(),
        }
    }

    /// Returns true if the host of `url` matches any pattern
    ///
    /// Unparseable URLs and URLs without a host never match.
    pub fn matches_url(&self, url: &str) -> bool {
        Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(|h| self.matches_host(h)))
            .unwrap_or(false)
    }

    pub fn matches_host(&self, host: &str) -> bool {
        self.patterns
            .iter()
            .any(|pattern| matches_host_pattern(pattern, host))
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
