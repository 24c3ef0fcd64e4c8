use crate::cache::{CacheFacade, RENDER_NAMESPACE};
use crate::config::RendererConfig;
use crate::detector::{signals, FetchStrategy, SiteDetector, SiteProfile};
use crate::renderer::browser::{
    BrowserLauncher, BrowserPage, BrowserSession, RequestPolicy, WaitUntil,
};
use crate::url::url_cache_key;
use anyhow::{anyhow, Result};
use futures::future::select_ok;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use url::Url;

/// Selectors that indicate a storefront has rendered its products
const STOREFRONT_SELECTORS: &[&str] = &[
    ".product-card",
    ".product-grid",
    "[data-product-id]",
    ".shopify-section",
    "form[action*='/cart/add']",
];

/// Selectors that indicate an SPA root has mounted children
const SPA_ROOT_SELECTORS: &[&str] = &[
    "#root > *",
    "#app > *",
    "#__next > *",
    "#__nuxt > *",
    "app-root > *",
];

/// Interval between selector polls while waiting for content
const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Grace period for closing a page or a discarded browser
const CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

static NON_TEXT_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(script|style|noscript|template)\b.*?</(script|style|noscript|template)>")
        .expect("valid regex")
});
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// How the final document was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderStrategy {
    Static,
    Headless,
}

impl fmt::Display for RenderStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static => write!(f, "static"),
            Self::Headless => write!(f, "headless"),
        }
    }
}

/// The document a page analysis runs on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedPage {
    pub html: String,
    pub url: String,
    pub elapsed_ms: u64,
    pub strategy: RenderStrategy,
    pub profile: SiteProfile,
}

/// Visible text length of markup with scripts, styles and tags removed
pub fn visible_text_len(html: &str) -> usize {
    let without_blocks = NON_TEXT_BLOCK.replace_all(html, " ");
    let text = TAG.replace_all(&without_blocks, " ");
    WHITESPACE.replace_all(text.trim(), " ").chars().count()
}

/// Whether static markup looks like it still needs script execution
///
/// Sparse means the visible text is below `ratio` of the markup, or the
/// markup is shorter than `min_length` and contains an SPA root container.
pub fn is_sparse(html: &str, ratio: f64, min_length: usize) -> bool {
    let markup_len = html.chars().count();
    if markup_len == 0 {
        return true;
    }

    let text_ratio = visible_text_len(html) as f64 / markup_len as f64;
    if text_ratio < ratio {
        return true;
    }

    markup_len < min_length && signals::contains_any(&html.to_lowercase(), signals::SPA_ROOT_MARKERS)
}

/// Chooses between the static HTML and a headless render for each page
///
/// Owns the browser session: it is launched on first headless use, shared by
/// every render afterwards (one page per render), and closed by `shutdown`.
pub struct HybridRenderer {
    launcher: Arc<dyn BrowserLauncher>,
    session: Mutex<Option<Arc<dyn BrowserSession>>>,
    detector: SiteDetector,
    cache: CacheFacade,
    ttl: Duration,
    config: RendererConfig,
    policy: RequestPolicy,
}

impl HybridRenderer {
    pub fn new(
        launcher: Arc<dyn BrowserLauncher>,
        detector: SiteDetector,
        cache: CacheFacade,
        ttl: Duration,
        config: RendererConfig,
    ) -> Self {
        let policy = RequestPolicy::new(&config.blocked_hosts);
        Self {
            launcher,
            session: Mutex::new(None),
            detector,
            cache,
            ttl,
            config,
            policy,
        }
    }

    /// Produces the document to analyze; never fails
    ///
    /// # Arguments
    ///
    /// * `url` - The page URL after redirects
    /// * `initial_html` - The statically fetched markup
    /// * `force_refresh` - Skip cached renders and profiles
    ///
    /// # Returns
    ///
    /// A `RenderedPage` whose strategy is `headless` only when a headless
    /// render was warranted and succeeded; otherwise it carries
    /// `initial_html` unchanged.
    pub async fn render(&self, url: &Url, initial_html: &str, force_refresh: bool) -> RenderedPage {
        let key = url_cache_key(RENDER_NAMESPACE, url.as_str());

        if !force_refresh {
            if let Some(page) = self.cache.get_json::<RenderedPage>(&key).await {
                return page;
            }
        }

        let start = Instant::now();
        let profile = self.detector.profile(initial_html, url, force_refresh).await;

        let wants_headless = match profile.recommended_strategy {
            FetchStrategy::Static => false,
            FetchStrategy::Headless => true,
            FetchStrategy::Hybrid => {
                let sparse = is_sparse(
                    initial_html,
                    self.config.sparse_ratio,
                    self.config.sparse_min_length,
                );
                tracing::debug!("Hybrid strategy for {}: sparse={}", url, sparse);
                sparse
            }
        };

        let (html, strategy) = if wants_headless && self.config.enabled {
            match self.render_headless(url, &profile).await {
                Ok(html) => (html, RenderStrategy::Headless),
                Err(e) => {
                    tracing::warn!("Headless render of {} failed, using static HTML: {:#}", url, e);
                    (initial_html.to_string(), RenderStrategy::Static)
                }
            }
        } else {
            (initial_html.to_string(), RenderStrategy::Static)
        };

        let page = RenderedPage {
            html,
            url: url.to_string(),
            elapsed_ms: start.elapsed().as_millis() as u64,
            strategy,
            profile,
        };

        tracing::info!(
            "Rendered {} via {} ({}, {}ms)",
            url,
            page.strategy,
            page.profile.framework,
            page.elapsed_ms
        );

        self.cache.set_json(&key, &page, self.ttl).await;
        page
    }

    /// Closes the shared browser, if one was launched
    pub async fn shutdown(&self) {
        let session = self.session.lock().await.take();
        if let Some(session) = session {
            match tokio::time::timeout(CLOSE_TIMEOUT, session.close()).await {
                Ok(Ok(())) => tracing::debug!("Headless browser closed"),
                Ok(Err(e)) => tracing::warn!("Failed to close headless browser: {:#}", e),
                Err(_) => tracing::warn!("Closing headless browser timed out"),
            }
        }
    }

    async fn session(&self, deadline: Instant) -> Result<Arc<dyn BrowserSession>> {
        let mut slot = self.session.lock().await;
        if let Some(session) = slot.as_ref() {
            return Ok(Arc::clone(session));
        }

        let session: Arc<dyn BrowserSession> =
            match tokio::time::timeout_at(deadline.into(), self.launcher.launch()).await {
                Ok(launched) => Arc::from(launched?),
                Err(_) => return Err(anyhow!("{} launch timed out", self.launcher.name())),
            };

        *slot = Some(Arc::clone(&session));
        Ok(session)
    }

    /// Drops a session that can no longer open pages so the next render relaunches
    async fn discard_session(&self, session: &Arc<dyn BrowserSession>) {
        {
            let mut slot = self.session.lock().await;
            let is_current = slot
                .as_ref()
                .is_some_and(|current| std::ptr::addr_eq(Arc::as_ptr(current), Arc::as_ptr(session)));
            if !is_current {
                return;
            }
            *slot = None;
        }

        tracing::warn!("Discarding unresponsive {} browser", self.launcher.name());
        match tokio::time::timeout(CLOSE_TIMEOUT, session.close()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::debug!("Failed to close discarded browser: {:#}", e),
            Err(_) => tracing::debug!("Closing discarded browser timed out"),
        }
    }

    async fn render_headless(&self, url: &Url, profile: &SiteProfile) -> Result<String> {
        let ceiling = Duration::from_millis(self.config.session_ceiling_ms());
        let deadline = Instant::now() + ceiling;
        let session = self.session(deadline).await?;

        let mut page = match tokio::time::timeout_at(deadline.into(), session.new_page()).await {
            Ok(Ok(page)) => page,
            Ok(Err(e)) => {
                self.discard_session(&session).await;
                return Err(e.context("failed to open a page"));
            }
            Err(_) => {
                self.discard_session(&session).await;
                return Err(anyhow!("opening a page exceeded {}ms", ceiling.as_millis()));
            }
        };

        let drive = self.drive(page.as_mut(), url, profile);
        let result = match tokio::time::timeout_at(deadline.into(), drive).await {
            Ok(result) => result,
            Err(_) => Err(anyhow!("headless session exceeded {}ms", ceiling.as_millis())),
        };

        match tokio::time::timeout(CLOSE_TIMEOUT, page.close()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::debug!("Failed to close page for {}: {:#}", url, e),
            Err(_) => tracing::debug!("Closing page for {} timed out", url),
        }

        result
    }

    async fn drive(&self, page: &mut dyn BrowserPage, url: &Url, profile: &SiteProfile) -> Result<String> {
        page.block_requests(&self.policy).await?;
        page.navigate(
            url.as_str(),
            WaitUntil::DomContentLoaded,
            Duration::from_millis(self.config.content_wait_ms),
        )
        .await?;

        if let Some((selectors, wait)) = self.ready_selectors(profile) {
            match wait_for_any(&*page, selectors, wait).await {
                Some(selector) => tracing::debug!("Content ready on {} ({})", url, selector),
                None => tracing::debug!("No content-ready selector matched on {}", url),
            }
        }

        page.content().await
    }

    fn ready_selectors(&self, profile: &SiteProfile) -> Option<(&'static [&'static str], Duration)> {
        if profile.framework.is_storefront() {
            Some((
                STOREFRONT_SELECTORS,
                Duration::from_millis(self.config.storefront_wait_ms),
            ))
        } else if profile.needs_js_rendering {
            Some((SPA_ROOT_SELECTORS, Duration::from_millis(self.config.spa_wait_ms)))
        } else {
            None
        }
    }
}

/// Races the selectors against `wait`, returning the first that appears
async fn wait_for_any(
    page: &dyn BrowserPage,
    selectors: &'static [&'static str],
    wait: Duration,
) -> Option<&'static str> {
    let watchers = selectors
        .iter()
        .map(|&selector| Box::pin(wait_for_selector(page, selector)));

    match tokio::time::timeout(wait, select_ok(watchers)).await {
        Ok(Ok((selector, _))) => Some(selector),
        _ => None,
    }
}

async fn wait_for_selector(page: &dyn BrowserPage, selector: &'static str) -> Result<&'static str> {
    loop {
        if let Ok(true) = page.has_selector(selector).await {
            return Ok(selector);
        }
        tokio::time::sleep(SELECTOR_POLL_INTERVAL).await;
    }
}
