//! Site technology detector
//!
//! Classifies the framework or CMS behind a page from its raw HTML and
//! derives how the renderer should fetch it. Classification is driven by
//! the ordered `signals::SIGNALS` table; `detect` is pure and the
//! `SiteDetector` wrapper adds a per-domain cache round-trip.

mod profile;
pub mod signals;

pub use profile::{Complexity, FetchStrategy, Framework, RenderingMethod, SiteProfile};

use crate::cache::{CacheFacade, PROFILE_NAMESPACE};
use crate::url::{domain_cache_key, extract_domain};
use signals::{
    contains_any, CMS_PLUGIN_MARKERS, INFINITE_SCROLL_MARKERS, LAZY_LOAD_MARKERS, SIGNALS,
};
use std::time::Duration;
use url::Url;

/// Script tag count above which a page counts as highly complex
const HIGH_SCRIPT_COUNT: usize = 20;

/// Markup size above which a page counts as at least medium complexity
const LARGE_HTML_BYTES: usize = 500 * 1024;

/// Classifies a page's rendering technology
///
/// Deterministic for a given input. A page matching no signal is reported
/// as `Framework::Unknown` with the static strategy.
///
/// # Arguments
///
/// * `html` - Raw markup as served over HTTP
/// * `url` - The page URL, used only for logging
pub fn detect(html: &str, url: &Url) -> SiteProfile {
    let lower = html.to_lowercase();

    let mut framework = Framework::Unknown;
    let mut evidence = Vec::new();

    for (index, signal) in SIGNALS.iter().enumerate() {
        if signal.matches(index, html, &lower) {
            framework = signal.framework;
            evidence.push(format!("{}: {}", signal.framework, signal.label));
        }
    }

    let needs_js_rendering = framework.is_spa();
    let has_plugins = framework.is_cms() && contains_any(&lower, CMS_PLUGIN_MARKERS);
    if has_plugins {
        evidence.push("page-builder plugin markers".to_string());
    }

    let complexity = complexity_of(html, &lower, needs_js_rendering);

    let recommended_strategy = if needs_js_rendering {
        FetchStrategy::Headless
    } else if framework.is_storefront() || has_plugins {
        FetchStrategy::Hybrid
    } else {
        FetchStrategy::Static
    };

    tracing::debug!(
        "Detected {} on {} (strategy {}, {:?} complexity)",
        framework,
        url,
        recommended_strategy,
        complexity
    );

    SiteProfile {
        framework,
        rendering_method: framework.rendering_method(),
        needs_js_rendering,
        complexity,
        recommended_strategy,
        signals: evidence,
    }
}

fn complexity_of(html: &str, lower: &str, needs_js_rendering: bool) -> Complexity {
    let script_count = lower.matches("<script").count();

    if script_count > HIGH_SCRIPT_COUNT || contains_any(lower, INFINITE_SCROLL_MARKERS) {
        Complexity::High
    } else if needs_js_rendering
        || html.len() > LARGE_HTML_BYTES
        || contains_any(lower, LAZY_LOAD_MARKERS)
    {
        Complexity::Medium
    } else {
        Complexity::Low
    }
}

/// Detector with a per-domain profile cache
#[derive(Clone)]
pub struct SiteDetector {
    cache: CacheFacade,
    ttl: Duration,
}

impl SiteDetector {
    pub fn new(cache: CacheFacade, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// Returns the cached profile for the page's domain, detecting and
    /// storing it on a miss or when `force_refresh` is set
    pub async fn profile(&self, html: &str, url: &Url, force_refresh: bool) -> SiteProfile {
        let key = extract_domain(url).map(|domain| domain_cache_key(PROFILE_NAMESPACE, &domain));

        if let (Some(key), false) = (key.as_deref(), force_refresh) {
            if let Some(profile) = self.cache.get_json::<SiteProfile>(key).await {
                return profile;
            }
        }

        let profile = detect(html, url);

        if let Some(key) = key.as_deref() {
            self.cache.set_json(key, &profile, self.ttl).await;
        }

        profile
    }
}
