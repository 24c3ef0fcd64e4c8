//! Integration tests for the analysis engine
//!
//! These tests use wiremock to create mock HTTP servers and run full
//! analyses end-to-end, with a browser launcher that always fails.

use seoscope::cache::{CacheFacade, MemoryCache, LINK_NAMESPACE};
use seoscope::config::Config;
use seoscope::detector::Framework;
use seoscope::renderer::{NoopLauncher, RenderStrategy};
use seoscope::url::exact_url_cache_key;
use seoscope::{score, Analyzer, SeoscopeError};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ARTICLE: &str = r#"<!DOCTYPE html>
<html lang="en"><head>
<title>Choosing the right hiking boots for rocky trails</title>
<meta name="description" content="How to pick boots that keep your feet safe.">
<meta name="viewport" content="width=device-width, initial-scale=1">
<link rel="icon" href="/favicon.ico">
</head><body>
<h1>Hiking boots</h1>
<p>Good hiking boots matter. Hiking boots protect your ankles on rocky trails.</p>
<img src="/boots.jpg" alt="A pair of leather hiking boots">
<a href="/ok">Guide</a>
<a href="/gone">Old guide</a>
<a href="mailto:team@example.com">Mail us</a>
</body></html>"#;

/// Creates a test configuration
fn create_test_config(check_links: bool) -> Config {
    let mut config = Config::default();
    config.user_agent.crawler_name = "TestBot".to_string();
    config.links.enabled = check_links;
    config.links.timeout_secs = 2;
    config
}

fn create_analyzer(config: Config, cache: CacheFacade) -> Analyzer {
    Analyzer::with_components(config, cache, Arc::new(NoopLauncher))
        .expect("Failed to build analyzer")
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_analysis_with_link_checks() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/article", ARTICLE).await;
    Mock::given(method("HEAD"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/boots.jpg"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let cache = CacheFacade::new(Arc::new(MemoryCache::new()));
    let analyzer = create_analyzer(create_test_config(true), cache.clone());
    let url = format!("{}/article", mock_server.uri());

    let facts = analyzer.analyze(&url, false).await.expect("analysis failed");

    assert_eq!(
        facts.title.text.as_deref(),
        Some("Choosing the right hiking boots for rocky trails")
    );
    assert_eq!(facts.headings.h1_count(), 1);
    assert_eq!(facts.links.internal_count, 2);
    assert!(facts.performance.response_time_ms.is_some());
    assert_eq!(facts.rendering.strategy, RenderStrategy::Static);

    let health = facts.link_health.as_ref().expect("links were not checked");
    assert_eq!(health.checked, 3);
    assert_eq!(health.ok, 2);
    assert_eq!(health.broken.len(), 1);
    assert_eq!(health.broken[0].status, 404);
    assert!(health.broken[0].url.ends_with("/gone"));

    // Healthy links outlive failures in the cache
    let ok_ttl = cache
        .ttl(&exact_url_cache_key(LINK_NAMESPACE, &format!("{}/ok", mock_server.uri())))
        .await
        .expect("ok link not cached");
    let gone_ttl = cache
        .ttl(&exact_url_cache_key(LINK_NAMESPACE, &format!("{}/gone", mock_server.uri())))
        .await
        .expect("broken link not cached");
    assert!(ok_ttl > Duration::from_secs(23 * 3600));
    assert!(gone_ttl <= Duration::from_secs(3600));

    let report = score(&facts);
    // Plain http, no canonical, no structured data
    assert_eq!(report.score, 80);
    assert!(report
        .issues
        .iter()
        .any(|i| i.message.starts_with("Broken link (404)")));

    analyzer.shutdown().await;
}

#[tokio::test]
async fn test_repeat_analysis_is_served_from_cache() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/article"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(ARTICLE, "text/html"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let analyzer = create_analyzer(
        create_test_config(false),
        CacheFacade::new(Arc::new(MemoryCache::new())),
    );
    let url = format!("{}/article", mock_server.uri());

    let first = analyzer.analyze(&url, false).await.unwrap();
    let second = analyzer.analyze(&url, false).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    assert_eq!(score(&first), score(&second));
}

#[tokio::test]
async fn test_force_refresh_refetches() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/article"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(ARTICLE, "text/html"))
        .expect(2)
        .mount(&mock_server)
        .await;

    let analyzer = create_analyzer(
        create_test_config(false),
        CacheFacade::new(Arc::new(MemoryCache::new())),
    );
    let url = format!("{}/article", mock_server.uri());

    analyzer.analyze(&url, false).await.unwrap();
    analyzer.analyze(&url, true).await.unwrap();
}

#[tokio::test]
async fn test_spa_falls_back_to_static_when_browser_fails() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/",
        r#"<html><head><title>App</title></head>
           <body><div id="root" data-reactroot=""></div>
           <script src="/static/js/react-dom.production.min.js"></script></body></html>"#,
    )
    .await;

    let analyzer = create_analyzer(
        create_test_config(false),
        CacheFacade::new(Arc::new(MemoryCache::new())),
    );

    let facts = analyzer
        .analyze(&format!("{}/", mock_server.uri()), false)
        .await
        .expect("render failure must not fail the analysis");

    assert_eq!(facts.rendering.strategy, RenderStrategy::Static);
    assert_eq!(facts.rendering.framework, Framework::React);
    assert!(facts.rendering.needs_js_rendering);
    assert_eq!(facts.title.text.as_deref(), Some("App"));
}

#[tokio::test]
async fn test_http_error_status_fails_the_analysis() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let analyzer = create_analyzer(create_test_config(false), CacheFacade::disabled());
    let err = analyzer
        .analyze(&format!("{}/missing", mock_server.uri()), false)
        .await
        .unwrap_err();

    assert!(matches!(err, SeoscopeError::HttpStatus { status: 404, .. }));
}

#[tokio::test]
async fn test_unreachable_host_fails_the_analysis() {
    let analyzer = create_analyzer(create_test_config(false), CacheFacade::disabled());
    let err = analyzer
        .analyze("http://127.0.0.1:1/", false)
        .await
        .unwrap_err();

    assert!(matches!(err, SeoscopeError::FetchFailed { .. }));
}

#[tokio::test]
async fn test_unreachable_links_are_unknown() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/",
        r#"<title>Links</title><a href="http://127.0.0.1:1/nowhere">dead host</a>"#,
    )
    .await;

    let analyzer = create_analyzer(
        create_test_config(true),
        CacheFacade::new(Arc::new(MemoryCache::new())),
    );
    let facts = analyzer
        .analyze(&format!("{}/", mock_server.uri()), false)
        .await
        .unwrap();

    let health = facts.link_health.expect("links were not checked");
    assert_eq!(health.checked, 1);
    assert_eq!(health.unknown, 1);
    assert!(health.broken.is_empty());
}
