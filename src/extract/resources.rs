use crate::extract::rel_contains;
use crate::url::resolve_href;
use scraper::Html;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use url::Url;

/// Absolute URLs referenced by the page, candidates for link checks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceFacts {
    /// Anchors, images, scripts and stylesheets in document order, deduplicated
    pub urls: Vec<String>,
}

pub(crate) fn extract(document: &Html, page: &Url) -> ResourceFacts {
    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    for element in document.select(selector!("a[href], img[src], script[src], link[rel][href]")) {
        let value = element.value();
        let reference = match value.name() {
            "a" => value.attr("href"),
            "link" if rel_contains(value.attr("rel"), "stylesheet") => value.attr("href"),
            "img" | "script" => value.attr("src"),
            _ => None,
        };

        if let Some(url) = reference.and_then(|r| resolve_href(r, page)) {
            let url = url.to_string();
            if seen.insert(url.clone()) {
                urls.push(url);
            }
        }
    }

    ResourceFacts { urls }
}
