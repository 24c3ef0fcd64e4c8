use serde::{Deserialize, Serialize};

/// Main configuration structure for Seoscope
///
/// Every section has defaults, so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub http: HttpConfig,
    pub renderer: RendererConfig,
    pub links: LinkCheckConfig,
    pub cache: CacheConfig,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "SeoscopeBot".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/seoscope".to_string(),
            contact_email: "bot@example.com".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Page fetch configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Overall timeout for the initial page fetch (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Maximum number of redirects to follow
    #[serde(rename = "max-redirects")]
    pub max_redirects: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_redirects: 5,
        }
    }
}

/// Hybrid renderer configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RendererConfig {
    /// When false, every page is analyzed from its static HTML
    pub enabled: bool,

    /// Time allowed for navigation and content to appear (milliseconds)
    #[serde(rename = "content-wait-ms")]
    pub content_wait_ms: u64,

    /// Extra budget on top of the content wait for the whole session (milliseconds)
    #[serde(rename = "budget-ms")]
    pub budget_ms: u64,

    /// Content-ready wait for e-commerce storefronts (milliseconds)
    #[serde(rename = "storefront-wait-ms")]
    pub storefront_wait_ms: u64,

    /// Content-ready wait for generic SPA frameworks (milliseconds)
    #[serde(rename = "spa-wait-ms")]
    pub spa_wait_ms: u64,

    /// Text-to-markup ratio below which a page counts as sparse
    #[serde(rename = "sparse-ratio")]
    pub sparse_ratio: f64,

    /// Markup length below which a page with an SPA root counts as sparse
    #[serde(rename = "sparse-min-length")]
    pub sparse_min_length: usize,

    /// Host patterns whose requests are aborted during headless sessions
    #[serde(rename = "blocked-hosts")]
    pub blocked_hosts: Vec<String>,

    /// Explicit browser executable; auto-detected when absent
    #[serde(rename = "chrome-executable")]
    pub chrome_executable: Option<String>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            content_wait_ms: 30_000,
            budget_ms: 10_000,
            storefront_wait_ms: 15_000,
            spa_wait_ms: 5_000,
            sparse_ratio: 0.05,
            sparse_min_length: 500,
            blocked_hosts: default_blocked_hosts(),
            chrome_executable: None,
        }
    }
}

impl RendererConfig {
    /// Hard ceiling for one headless session
    pub fn session_ceiling_ms(&self) -> u64 {
        self.content_wait_ms + self.budget_ms
    }
}

fn default_blocked_hosts() -> Vec<String> {
    [
        "*.google-analytics.com",
        "*.googletagmanager.com",
        "*.doubleclick.net",
        "*.facebook.net",
        "*.hotjar.com",
        "*.segment.io",
        "*.mixpanel.com",
        "*.clarity.ms",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Link health checker configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LinkCheckConfig {
    /// When false, discovered links are not probed
    pub enabled: bool,

    /// Per-URL probe timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Maximum number of probes in flight at once
    #[serde(rename = "batch-size")]
    pub batch_size: usize,

    /// Maximum number of discovered URLs probed per page
    #[serde(rename = "max-candidates")]
    pub max_candidates: usize,
}

impl Default for LinkCheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_secs: 5,
            batch_size: 50,
            max_candidates: 150,
        }
    }
}

/// Which cache backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Process-local map, lost on exit
    #[default]
    Memory,
    /// SQLite file shared across runs
    Sqlite,
    /// No caching at all
    None,
}

/// Cache configuration, including the TTL of each entry class
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: CacheBackend,

    /// SQLite database path (sqlite backend only)
    pub path: Option<String>,

    #[serde(rename = "profile-ttl-secs")]
    pub profile_ttl_secs: u64,

    #[serde(rename = "render-ttl-secs")]
    pub render_ttl_secs: u64,

    #[serde(rename = "facts-ttl-secs")]
    pub facts_ttl_secs: u64,

    #[serde(rename = "link-ok-ttl-secs")]
    pub link_ok_ttl_secs: u64,

    #[serde(rename = "link-error-ttl-secs")]
    pub link_error_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Memory,
            path: None,
            profile_ttl_secs: 7 * 24 * 3600,
            render_ttl_secs: 3600,
            facts_ttl_secs: 6 * 3600,
            link_ok_ttl_secs: 24 * 3600,
            link_error_ttl_secs: 3600,
        }
    }
}
