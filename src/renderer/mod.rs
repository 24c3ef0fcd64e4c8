//! Hybrid renderer
//!
//! Decides per page whether the static HTML is good enough or the page must
//! be executed in a headless browser, and falls back to the static HTML
//! whenever headless rendering fails.

mod browser;
pub mod chromium;
mod hybrid;

pub use browser::{
    BrowserLauncher, BrowserPage, BrowserSession, NoopLauncher, RequestPolicy, ResourceKind,
    WaitUntil,
};
pub use chromium::ChromiumLauncher;
pub use hybrid::{is_sparse, visible_text_len, HybridRenderer, RenderStrategy, RenderedPage};

use crate::config::RendererConfig;
use std::sync::Arc;

/// Picks the launcher for a renderer configuration
pub fn default_launcher(config: &RendererConfig) -> Arc<dyn BrowserLauncher> {
    if config.enabled {
        Arc::new(ChromiumLauncher::new(config.chrome_executable.clone()))
    } else {
        Arc::new(NoopLauncher)
    }
}
