//! Browser abstraction for headless rendering
//!
//! The renderer only ever talks to these traits. `chromium` provides the
//! real implementation; `NoopLauncher` stands in when headless rendering
//! is disabled or no browser is installed.

use crate::url::HostMatcher;
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Starts browser sessions
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    /// Launch a new browser process
    async fn launch(&self) -> Result<Box<dyn BrowserSession>>;
    /// Short name for logging
    fn name(&self) -> &'static str;
}

/// A running browser shared by every render
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Open a blank page (tab)
    async fn new_page(&self) -> Result<Box<dyn BrowserPage>>;
    /// Tear the browser down
    async fn close(&self) -> Result<()>;
}

/// One page used for exactly one render
#[async_trait]
pub trait BrowserPage: Send + Sync {
    /// Install request interception according to `policy`
    async fn block_requests(&mut self, policy: &RequestPolicy) -> Result<()>;
    /// Navigate and wait for `wait_until`, failing after `timeout`
    async fn navigate(&mut self, url: &str, wait_until: WaitUntil, timeout: Duration)
        -> Result<()>;
    /// Whether an element currently matches `selector`
    async fn has_selector(&self, selector: &str) -> Result<bool>;
    /// Serialized DOM of the current document
    async fn content(&self) -> Result<String>;
    /// Close the page
    async fn close(self: Box<Self>) -> Result<()>;
}

/// Navigation gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitUntil {
    /// `DOMContentLoaded` fired
    DomContentLoaded,
    /// The `load` event fired
    Load,
}

impl WaitUntil {
    /// Whether a `document.readyState` value satisfies this gate
    pub fn is_satisfied_by(&self, ready_state: &str) -> bool {
        match self {
            Self::DomContentLoaded => matches!(ready_state, "interactive" | "complete"),
            Self::Load => ready_state == "complete",
        }
    }
}

/// Browser-independent resource classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Document,
    Stylesheet,
    Script,
    Image,
    Media,
    Font,
    Other,
}

/// Which subresource loads a headless page may skip
#[derive(Debug, Clone)]
pub struct RequestPolicy {
    blocked_kinds: Vec<ResourceKind>,
    blocked_hosts: HostMatcher,
}

impl RequestPolicy {
    /// Blocks images, media and fonts plus every host matching `blocked_hosts`
    pub fn new(blocked_hosts: &[String]) -> Self {
        Self {
            blocked_kinds: vec![ResourceKind::Image, ResourceKind::Media, ResourceKind::Font],
            blocked_hosts: HostMatcher::new(blocked_hosts),
        }
    }

    /// Decides whether a request should be failed instead of continued
    ///
    /// Documents and stylesheets always load; layout-dependent extraction
    /// needs them.
    pub fn should_block(&self, url: &str, kind: ResourceKind) -> bool {
        match kind {
            ResourceKind::Document | ResourceKind::Stylesheet => false,
            kind if self.blocked_kinds.contains(&kind) => true,
            _ => self.blocked_hosts.matches_url(url),
        }
    }
}

/// Launcher used when no headless browser is available
///
/// Every launch fails, so the renderer always falls back to static HTML.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLauncher;

#[async_trait]
impl BrowserLauncher for NoopLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        Err(anyhow::anyhow!("headless browser not available"))
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> RequestPolicy {
        RequestPolicy::new(&["*.doubleclick.net".to_string(), "www.google-analytics.com".to_string()])
    }

    #[test]
    fn test_blocks_heavy_media() {
        let policy = policy();
        for kind in [ResourceKind::Image, ResourceKind::Media, ResourceKind::Font] {
            assert!(policy.should_block("https://example.com/a", kind));
        }
        assert!(!policy.should_block("https://example.com/app.js", ResourceKind::Script));
    }

    #[test]
    fn test_blocks_tracking_hosts() {
        let policy = policy();
        assert!(policy.should_block(
            "https://stats.g.doubleclick.net/collect",
            ResourceKind::Script
        ));
        assert!(policy.should_block(
            "https://www.google-analytics.com/analytics.js",
            ResourceKind::Other
        ));
        assert!(!policy.should_block("https://cdn.example.com/x.js", ResourceKind::Script));
    }

    #[test]
    fn test_never_blocks_stylesheets() {
        let policy = policy();
        assert!(!policy.should_block(
            "https://ad.doubleclick.net/style.css",
            ResourceKind::Stylesheet
        ));
        assert!(!policy.should_block("https://example.com/", ResourceKind::Document));
    }

    #[test]
    fn test_wait_until_gates() {
        assert!(WaitUntil::DomContentLoaded.is_satisfied_by("interactive"));
        assert!(WaitUntil::DomContentLoaded.is_satisfied_by("complete"));
        assert!(!WaitUntil::DomContentLoaded.is_satisfied_by("loading"));
        assert!(!WaitUntil::Load.is_satisfied_by("interactive"));
        assert!(WaitUntil::Load.is_satisfied_by("complete"));
    }

    #[tokio::test]
    async fn test_noop_launcher_fails() {
        assert!(NoopLauncher.launch().await.is_err());
    }
}
