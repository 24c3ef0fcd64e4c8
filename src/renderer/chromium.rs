//! Chromium implementation of the browser traits, driven over CDP by
//! chromiumoxide

use crate::renderer::browser::{
    BrowserLauncher, BrowserPage, BrowserSession, RequestPolicy, ResourceKind, WaitUntil,
};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::fetch::{
    ContinueRequestParams, EnableParams, EventRequestPaused, FailRequestParams, RequestPattern,
    RequestStage,
};
use chromiumoxide::cdp::browser_protocol::network::{ErrorReason, ResourceType};
use chromiumoxide::cdp::browser_protocol::page::NavigateParams;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Interval between `document.readyState` polls
const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);

const READY_STATE_SCRIPT: &str =
    "document.location.href === 'about:blank' ? 'loading' : document.readyState";

/// Launches headless Chromium
#[derive(Debug, Clone, Default)]
pub struct ChromiumLauncher {
    executable: Option<String>,
}

impl ChromiumLauncher {
    /// `executable` overrides chromiumoxide's browser auto-detection
    pub fn new(executable: Option<String>) -> Self {
        Self { executable }
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        let mut builder = BrowserConfig::builder()
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking");

        if let Some(path) = &self.executable {
            builder = builder.chrome_executable(path);
        }

        let config = builder
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build browser config: {e}"))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("failed to launch Chromium")?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::trace!("Chromium handler event error: {}", e);
                }
            }
        });

        tracing::info!("Launched headless Chromium");

        Ok(Box::new(ChromiumSession {
            browser: Mutex::new(browser),
            handler,
        }))
    }

    fn name(&self) -> &'static str {
        "chromium"
    }
}

/// A running Chromium process
pub struct ChromiumSession {
    browser: Mutex<Browser>,
    handler: JoinHandle<()>,
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn new_page(&self) -> Result<Box<dyn BrowserPage>> {
        let page = self
            .browser
            .lock()
            .await
            .new_page("about:blank")
            .await
            .context("failed to create new page")?;

        Ok(Box::new(ChromiumPage {
            page,
            interceptor: None,
        }))
    }

    async fn close(&self) -> Result<()> {
        let mut browser = self.browser.lock().await;
        let closed = browser.close().await.context("failed to close Chromium");
        let _ = browser.wait().await;
        self.handler.abort();
        closed.map(|_| ())
    }
}

/// A single Chromium tab
pub struct ChromiumPage {
    page: Page,
    interceptor: Option<JoinHandle<()>>,
}

impl ChromiumPage {
    async fn navigate_and_wait(&self, url: &str, wait_until: WaitUntil) -> Result<()> {
        let response = self
            .page
            .execute(NavigateParams::new(url))
            .await
            .context("navigation failed")?;

        if let Some(error) = &response.result.error_text {
            bail!("navigation to {url} failed: {error}");
        }

        loop {
            let state: String = self
                .page
                .evaluate(READY_STATE_SCRIPT)
                .await
                .context("failed to read document state")?
                .into_value()?;

            if wait_until.is_satisfied_by(&state) {
                return Ok(());
            }
            tokio::time::sleep(READY_POLL_INTERVAL).await;
        }
    }
}

fn resource_kind(resource_type: &ResourceType) -> ResourceKind {
    match resource_type {
        ResourceType::Document => ResourceKind::Document,
        ResourceType::Stylesheet => ResourceKind::Stylesheet,
        ResourceType::Script => ResourceKind::Script,
        ResourceType::Image => ResourceKind::Image,
        ResourceType::Media => ResourceKind::Media,
        ResourceType::Font => ResourceKind::Font,
        _ => ResourceKind::Other,
    }
}

#[async_trait]
impl BrowserPage for ChromiumPage {
    async fn block_requests(&mut self, policy: &RequestPolicy) -> Result<()> {
        let mut paused = self
            .page
            .event_listener::<EventRequestPaused>()
            .await
            .context("failed to listen for paused requests")?;

        let page = self.page.clone();
        let policy = policy.clone();
        self.interceptor = Some(tokio::spawn(async move {
            while let Some(event) = paused.next().await {
                let kind = resource_kind(&event.resource_type);
                let outcome = if policy.should_block(&event.request.url, kind) {
                    tracing::trace!("Blocking {:?} request {}", kind, event.request.url);
                    page.execute(FailRequestParams::new(
                        event.request_id.clone(),
                        ErrorReason::BlockedByClient,
                    ))
                    .await
                    .map(|_| ())
                } else {
                    page.execute(ContinueRequestParams::new(event.request_id.clone()))
                        .await
                        .map(|_| ())
                };

                if let Err(e) = outcome {
                    tracing::trace!("Failed to resolve paused request: {}", e);
                }
            }
        }));

        self.page
            .execute(EnableParams {
                patterns: Some(vec![RequestPattern {
                    url_pattern: Some("*".to_string()),
                    resource_type: None,
                    request_stage: Some(RequestStage::Request),
                }]),
                handle_auth_requests: None,
            })
            .await
            .context("failed to enable request interception")?;

        Ok(())
    }

    async fn navigate(
        &mut self,
        url: &str,
        wait_until: WaitUntil,
        timeout: Duration,
    ) -> Result<()> {
        match tokio::time::timeout(timeout, self.navigate_and_wait(url, wait_until)).await {
            Ok(result) => result,
            Err(_) => bail!("navigation timed out after {}ms", timeout.as_millis()),
        }
    }

    async fn has_selector(&self, selector: &str) -> Result<bool> {
        Ok(self.page.find_element(selector).await.is_ok())
    }

    async fn content(&self) -> Result<String> {
        self.page.content().await.context("failed to read page content")
    }

    async fn close(self: Box<Self>) -> Result<()> {
        if let Some(interceptor) = &self.interceptor {
            interceptor.abort();
        }
        self.page.close().await.context("failed to close page")
    }
}
