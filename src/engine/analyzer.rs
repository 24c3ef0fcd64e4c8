use crate::cache::{build_cache, CacheFacade, CacheTtls, FACTS_NAMESPACE, RENDER_NAMESPACE};
use crate::checker::{build_link_client, LinkChecker, LinkHealthSummary};
use crate::config::{validate, Config};
use crate::detector::SiteDetector;
use crate::engine::fetcher::PageFetcher;
use crate::extract::{extract, RenderingFacts, ScrapedFactSet};
use crate::renderer::{default_launcher, BrowserLauncher, HybridRenderer};
use crate::url::{parse_page_url, url_cache_key};
use crate::Result;
use std::sync::Arc;
use std::time::Instant;

/// The adaptive page analysis engine
///
/// Sequences fetch, detection, rendering, extraction and link checks for
/// one URL at a time, memoizing each expensive step. One `Analyzer` owns at
/// most one headless browser; call `shutdown` before dropping it.
pub struct Analyzer {
    config: Config,
    cache: CacheFacade,
    ttls: CacheTtls,
    fetcher: PageFetcher,
    renderer: HybridRenderer,
    checker: LinkChecker,
}

impl Analyzer {
    /// Creates an analyzer with the configured cache backend and browser
    ///
    /// # Returns
    ///
    /// * `Ok(Analyzer)` - Ready to analyze
    /// * `Err(SeoscopeError)` - Invalid configuration, or the cache or HTTP
    ///   clients could not be set up
    pub fn new(config: Config) -> Result<Self> {
        validate(&config)?;
        let cache = CacheFacade::new(build_cache(&config.cache)?);
        let launcher = default_launcher(&config.renderer);
        Self::with_components(config, cache, launcher)
    }

    /// Creates an analyzer around an explicit cache and browser launcher
    pub fn with_components(
        config: Config,
        cache: CacheFacade,
        launcher: Arc<dyn BrowserLauncher>,
    ) -> Result<Self> {
        let ttls = CacheTtls::from(&config.cache);

        let detector = SiteDetector::new(cache.clone(), ttls.profile);
        let renderer = HybridRenderer::new(
            launcher,
            detector,
            cache.clone(),
            ttls.render,
            config.renderer.clone(),
        );
        let checker = LinkChecker::new(
            build_link_client(&config.user_agent, &config.links)?,
            cache.clone(),
            ttls,
            config.links.batch_size,
        );

        tracing::debug!("Analyzer ready ({} cache)", cache.backend_name());

        Ok(Self {
            fetcher: PageFetcher::new(&config)?,
            config,
            cache,
            ttls,
            renderer,
            checker,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Analyzes one page
    ///
    /// # Arguments
    ///
    /// * `url` - The page to analyze; a missing scheme defaults to `https`
    /// * `force_refresh` - Bypass every cached entry for this page and its domain
    ///
    /// # Returns
    ///
    /// * `Ok(ScrapedFactSet)` - The page's facts, from cache when fresh
    /// * `Err(SeoscopeError)` - The URL is invalid or the page could not be
    ///   fetched; nothing after the fetch can fail an analysis
    pub async fn analyze(&self, url: &str, force_refresh: bool) -> Result<ScrapedFactSet> {
        let page_url = parse_page_url(url)?;
        let key = url_cache_key(FACTS_NAMESPACE, page_url.as_str());

        if !force_refresh {
            if let Some(facts) = self.cache.get_json::<ScrapedFactSet>(&key).await {
                tracing::info!("Using cached analysis of {}", page_url);
                return Ok(facts);
            }
        }

        let start = Instant::now();
        let fetched = self.fetcher.fetch(&page_url).await?;

        let rendered = self
            .renderer
            .render(&fetched.final_url, &fetched.body, force_refresh)
            .await;

        let mut facts = extract(&rendered.html, &fetched.final_url, Some(&fetched.context))
            .with_rendering(RenderingFacts::from(&rendered));

        if self.config.links.enabled {
            let candidates = facts
                .resources
                .urls
                .iter()
                .take(self.config.links.max_candidates);
            let results = self.checker.check_all(candidates).await;
            let summary = LinkHealthSummary::from_results(&results);
            tracing::debug!(
                "Link health for {}: {} checked, {} broken",
                page_url,
                summary.checked,
                summary.broken_count()
            );
            facts = facts.with_link_health(summary);
        }

        self.cache.set_json(&key, &facts, self.ttls.facts).await;

        tracing::info!(
            "Analyzed {} in {}ms ({} render)",
            page_url,
            start.elapsed().as_millis(),
            rendered.strategy
        );

        Ok(facts)
    }

    /// Drops the cached render and fact-set of a page
    ///
    /// # Returns
    ///
    /// The number of cache entries deleted
    pub async fn invalidate(&self, url: &str) -> Result<usize> {
        let page_url = parse_page_url(url)?;
        let mut deleted = 0;
        for namespace in [RENDER_NAMESPACE, FACTS_NAMESPACE] {
            deleted += self
                .cache
                .invalidate(&url_cache_key(namespace, page_url.as_str()))
                .await;
        }
        tracing::debug!("Invalidated {} cache entries for {}", deleted, page_url);
        Ok(deleted)
    }

    /// Closes the headless browser, if one was launched
    pub async fn shutdown(&self) {
        self.renderer.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::renderer::NoopLauncher;
    use crate::SeoscopeError;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn analyzer() -> Analyzer {
        let mut config = Config::default();
        config.links.enabled = false;
        Analyzer::with_components(
            config,
            CacheFacade::new(Arc::new(MemoryCache::new())),
            Arc::new(NoopLauncher),
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = Config::default();
        config.links.batch_size = 0;
        assert!(matches!(Analyzer::new(config), Err(SeoscopeError::Config(_))));
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let err = analyzer().analyze("ftp://example.com/", false).await.unwrap_err();
        assert!(matches!(err, SeoscopeError::UrlError(_)));
    }

    #[tokio::test]
    async fn test_invalidate_forces_recompute() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<h1>First</h1>"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<h1>Second</h1>"))
            .mount(&server)
            .await;

        let analyzer = analyzer();
        let url = format!("{}/", server.uri());

        let first = analyzer.analyze(&url, false).await.unwrap();
        assert_eq!(first.headings.headings[0].text, "First");

        let cached = analyzer.analyze(&url, false).await.unwrap();
        assert_eq!(cached.headings.headings[0].text, "First");

        assert_eq!(analyzer.invalidate(&url).await.unwrap(), 2);

        let fresh = analyzer.analyze(&url, false).await.unwrap();
        assert_eq!(fresh.headings.headings[0].text, "Second");
    }
}
