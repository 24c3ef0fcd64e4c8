use url::Url;

/// Extracts the lowercase host from a URL
///
/// Returns `None` for URLs without a host (`data:`, `mailto:`...).
///
/// # Examples
///
/// ```
/// use url::Url;
/// use seoscope::url::extract_domain;
///
/// let url = Url::parse("https://Blog.Example.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("blog.example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str()
        .filter(|h| !h.is_empty())
        .map(|h| h.to_lowercase())
}

/// Compares two hosts ignoring case and a leading `www.`
///
/// `www.example.com` and `example.com` are treated as the same site for
/// internal/external link classification.
pub fn same_site(a: &str, b: &str) -> bool {
    strip_www(&a.to_lowercase()) == strip_www(&b.to_lowercase())
}

fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}
