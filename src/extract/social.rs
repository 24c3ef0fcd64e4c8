use scraper::Html;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Open Graph properties every shareable page should set
const REQUIRED_OPEN_GRAPH: &[&str] = &["og:title", "og:description", "og:image", "og:url"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialFacts {
    /// `og:*` properties, first value wins
    pub open_graph: BTreeMap<String, String>,
    /// `twitter:*` properties, first value wins
    pub twitter: BTreeMap<String, String>,
    pub missing_open_graph: Vec<String>,
}

impl SocialFacts {
    pub fn has_open_graph(&self) -> bool {
        !self.open_graph.is_empty()
    }

    pub fn has_twitter_card(&self) -> bool {
        self.twitter.contains_key("twitter:card")
    }
}

pub(crate) fn extract(document: &Html) -> SocialFacts {
    let mut facts = SocialFacts::default();

    for meta in document.select(selector!("meta[content]")) {
        let element = meta.value();
        let Some(key) = element.attr("property").or_else(|| element.attr("name")) else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let content = element.attr("content").unwrap_or("").trim().to_string();

        let target = if key.starts_with("og:") {
            &mut facts.open_graph
        } else if key.starts_with("twitter:") {
            &mut facts.twitter
        } else {
            continue;
        };
        target.entry(key).or_insert(content);
    }

    facts.missing_open_graph = REQUIRED_OPEN_GRAPH
        .iter()
        .filter(|p| !facts.open_graph.contains_key(**p))
        .map(|p| p.to_string())
        .collect();

    facts
}
