//! Link health checker
//!
//! Probes discovered URLs with bounded concurrency. Each outcome is cached
//! with a TTL chosen by its class, so healthy links are re-checked rarely
//! and failures get a chance to heal quickly.

mod summary;

pub use summary::{BrokenLink, LinkHealthSummary};

use crate::cache::{CacheFacade, CacheTtls, LINK_NAMESPACE};
use crate::config::{LinkCheckConfig, UserAgentConfig};
use crate::url::{exact_url_cache_key, is_checkable};
use futures::stream::{self, StreamExt};
use reqwest::{redirect::Policy, Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// Cached result of one probe
///
/// `Unreachable` is the network-failure sentinel; it is never confused with
/// a real status code and is reported to callers as unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "status", rename_all = "lowercase")]
pub enum LinkOutcome {
    Status(u16),
    Unreachable,
}

impl LinkOutcome {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status(code) => Some(*code),
            Self::Unreachable => None,
        }
    }

    fn is_success(&self) -> bool {
        matches!(self, Self::Status(code) if (200..300).contains(code))
    }
}

/// Builds the client used for link probes
///
/// Redirects are not followed so that 3xx responses are reported as such.
pub fn build_link_client(
    user_agent: &UserAgentConfig,
    config: &LinkCheckConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.timeout_secs))
        .redirect(Policy::none())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Checks link health with a bounded number of requests in flight
#[derive(Clone)]
pub struct LinkChecker {
    client: Client,
    cache: CacheFacade,
    ttls: CacheTtls,
    batch_size: usize,
}

impl LinkChecker {
    pub fn new(client: Client, cache: CacheFacade, ttls: CacheTtls, batch_size: usize) -> Self {
        Self {
            client,
            cache,
            ttls,
            batch_size: batch_size.max(1),
        }
    }

    /// Checks every probe-able URL in `urls`
    ///
    /// # Arguments
    ///
    /// * `urls` - Absolute URLs; duplicates and non-HTTP(S) entries are skipped
    ///
    /// # Returns
    ///
    /// A map from each checked URL to its status code, or `None` when the
    /// URL could not be reached.
    pub async fn check_all<I, S>(&self, urls: I) -> HashMap<String, Option<u16>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let targets: Vec<String> = urls
            .into_iter()
            .map(|u| u.as_ref().to_string())
            .filter(|u| is_checkable(u))
            .filter(|u| seen.insert(u.clone()))
            .collect();

        tracing::debug!("Checking {} links ({} in flight)", targets.len(), self.batch_size);

        stream::iter(targets)
            .map(|url| async move {
                let outcome = self.check(&url).await;
                (url, outcome.status_code())
            })
            .buffer_unordered(self.batch_size)
            .collect()
            .await
    }

    /// Checks one URL, consulting the cache first
    pub async fn check(&self, url: &str) -> LinkOutcome {
        let key = exact_url_cache_key(LINK_NAMESPACE, url);

        if let Some(outcome) = self.cache.get_json::<LinkOutcome>(&key).await {
            return outcome;
        }

        let outcome = self.probe(url).await;
        let ttl = if outcome.is_success() {
            self.ttls.link_ok
        } else {
            self.ttls.link_error
        };
        self.cache.set_json(&key, &outcome, ttl).await;

        outcome
    }

    async fn probe(&self, url: &str) -> LinkOutcome {
        let head = match self.client.head(url).send().await {
            Ok(response) => response.status(),
            Err(e) => {
                tracing::debug!("Link {} unreachable: {}", url, e);
                return LinkOutcome::Unreachable;
            }
        };

        if head != StatusCode::METHOD_NOT_ALLOWED && head != StatusCode::NOT_IMPLEMENTED {
            return LinkOutcome::Status(head.as_u16());
        }

        match self.client.get(url).send().await {
            Ok(response) => LinkOutcome::Status(response.status().as_u16()),
            Err(e) => {
                tracing::debug!("Link {} unreachable on GET: {}", url, e);
                LinkOutcome::Unreachable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use std::sync::Arc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn checker() -> (LinkChecker, CacheFacade) {
        let cache = CacheFacade::new(Arc::new(MemoryCache::new()));
        let client = build_link_client(&UserAgentConfig::default(), &LinkCheckConfig::default())
            .unwrap();
        (
            LinkChecker::new(client, cache.clone(), CacheTtls::default(), 4),
            cache,
        )
    }

    #[tokio::test]
    async fn test_status_codes_are_reported() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/moved"))
            .respond_with(
                ResponseTemplate::new(301).insert_header("location", "/ok"),
            )
            .mount(&server)
            .await;

        let (checker, _) = checker();
        let ok = format!("{}/ok", server.uri());
        let gone = format!("{}/gone", server.uri());
        let moved = format!("{}/moved", server.uri());

        let results = checker.check_all([&ok, &gone, &moved]).await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[&ok], Some(200));
        assert_eq!(results[&gone], Some(404));
        assert_eq!(results[&moved], Some(301));
    }

    #[tokio::test]
    async fn test_head_rejection_falls_back_to_get() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(405))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let (checker, _) = checker();
        let url = format!("{}/page", server.uri());

        assert_eq!(checker.check(&url).await, LinkOutcome::Status(200));
    }

    #[tokio::test]
    async fn test_duplicates_and_special_schemes_are_skipped() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let (checker, _) = checker();
        let url = format!("{}/a", server.uri());
        let results = checker
            .check_all([
                url.as_str(),
                url.as_str(),
                "mailto:a@example.com",
                "tel:+1555",
                "javascript:void(0)",
                "#top",
                "data:text/plain,hi",
            ])
            .await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[&url], Some(200));
    }

    #[tokio::test]
    async fn test_unreachable_is_unknown_with_short_ttl() {
        // Bind then drop a listener so the port refuses connections
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let url = format!("http://127.0.0.1:{}/x", port);

        let (checker, cache) = checker();
        let results = checker.check_all([&url]).await;
        assert_eq!(results[&url], None);

        let ttl = cache.ttl(&exact_url_cache_key(LINK_NAMESPACE, &url)).await.unwrap();
        assert!(ttl <= Duration::from_secs(3600));
        assert_eq!(
            cache
                .get_json::<LinkOutcome>(&exact_url_cache_key(LINK_NAMESPACE, &url))
                .await,
            Some(LinkOutcome::Unreachable)
        );
    }

    #[tokio::test]
    async fn test_ttl_depends_on_outcome_class() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/error"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let (checker, cache) = checker();
        let ok = format!("{}/ok", server.uri());
        let error = format!("{}/error", server.uri());
        checker.check_all([&ok, &error]).await;

        let ok_ttl = cache.ttl(&exact_url_cache_key(LINK_NAMESPACE, &ok)).await.unwrap();
        let error_ttl = cache.ttl(&exact_url_cache_key(LINK_NAMESPACE, &error)).await.unwrap();

        assert!(ok_ttl > Duration::from_secs(23 * 3600));
        assert!(error_ttl <= Duration::from_secs(3600));
        assert!(ok_ttl > error_ttl);
    }

    #[tokio::test]
    async fn test_trailing_slash_variants_are_cached_separately() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/a"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/a/"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let (checker, _) = checker();
        let bare = format!("{}/a", server.uri());
        let slashed = format!("{}/a/", server.uri());

        assert_eq!(checker.check(&bare).await, LinkOutcome::Status(200));
        assert_eq!(checker.check(&slashed).await, LinkOutcome::Status(404));
    }

    #[tokio::test]
    async fn test_cached_outcome_skips_network() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let (checker, _) = checker();
        let url = format!("{}/once", server.uri());

        assert_eq!(checker.check(&url).await, LinkOutcome::Status(200));
        assert_eq!(checker.check(&url).await, LinkOutcome::Status(200));
    }

    #[test]
    fn test_outcome_serialization_distinguishes_sentinel() {
        let json = serde_json::to_string(&LinkOutcome::Unreachable).unwrap();
        assert_eq!(json, r#"{"outcome":"unreachable"}"#);

        let json = serde_json::to_string(&LinkOutcome::Status(404)).unwrap();
        assert_eq!(json, r#"{"outcome":"status","status":404}"#);
    }
}
