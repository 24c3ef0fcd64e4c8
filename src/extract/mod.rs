//! Content extraction pipeline
//!
//! Parses a resolved document into a `ScrapedFactSet`. Each fact group is
//! extracted by its own module from the same parsed `Html`; a group that
//! finds nothing degrades to its defaults, so extraction as a whole cannot
//! fail.

/// Declares a lazily parsed, process-wide CSS selector
macro_rules! selector {
    ($css:expr) => {{
        static SELECTOR: once_cell::sync::Lazy<scraper::Selector> =
            once_cell::sync::Lazy::new(|| scraper::Selector::parse($css).expect("valid selector"));
        &*SELECTOR
    }};
}

mod content;
mod headings;
mod images;
mod integrations;
mod keywords;
mod links;
mod meta;
mod mobile;
mod performance;
mod resources;
mod security;
mod social;
mod structured;
mod technical;
mod title;

pub use content::ContentFacts;
pub use headings::{Heading, HeadingFacts};
pub use images::{ImageFacts, ImageInfo};
pub use integrations::IntegrationFacts;
pub use keywords::{keyword_density, Keyword, KeywordFacts};
pub use links::{LinkFacts, LinkInfo};
pub use meta::MetaFacts;
pub use mobile::MobileFacts;
pub use performance::PerformanceFacts;
pub use resources::ResourceFacts;
pub use security::{SecurityFacts, SecurityHeaders};
pub use social::SocialFacts;
pub use structured::StructuredDataFacts;
pub use technical::{Hreflang, TechnicalFacts};
pub use title::{TitleFacts, TitleSource};

use crate::checker::LinkHealthSummary;
use crate::detector::{Framework, RenderingMethod};
use crate::renderer::{RenderStrategy, RenderedPage};
use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Node};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;

/// What the HTTP layer observed about the initial response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseContext {
    pub status: u16,
    pub response_time_ms: u64,
    /// Header names are lower-cased
    pub headers: HashMap<String, String>,
}

impl ResponseContext {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// How the analyzed document was obtained
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderingFacts {
    pub strategy: RenderStrategy,
    pub framework: Framework,
    pub rendering_method: RenderingMethod,
    pub needs_js_rendering: bool,
    pub elapsed_ms: u64,
    pub signals: Vec<String>,
}

impl Default for RenderingFacts {
    fn default() -> Self {
        Self {
            strategy: RenderStrategy::Static,
            framework: Framework::Unknown,
            rendering_method: RenderingMethod::Static,
            needs_js_rendering: false,
            elapsed_ms: 0,
            signals: Vec::new(),
        }
    }
}

impl From<&RenderedPage> for RenderingFacts {
    fn from(page: &RenderedPage) -> Self {
        Self {
            strategy: page.strategy,
            framework: page.profile.framework,
            rendering_method: page.profile.rendering_method,
            needs_js_rendering: page.profile.needs_js_rendering,
            elapsed_ms: page.elapsed_ms,
            signals: page.profile.signals.clone(),
        }
    }
}

/// Every SEO-relevant fact extracted from one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapedFactSet {
    pub url: String,
    pub analyzed_at: DateTime<Utc>,
    pub title: TitleFacts,
    pub meta: MetaFacts,
    pub headings: HeadingFacts,
    pub images: ImageFacts,
    pub content: ContentFacts,
    pub keywords: KeywordFacts,
    pub links: LinkFacts,
    pub technical: TechnicalFacts,
    pub mobile: MobileFacts,
    pub security: SecurityFacts,
    pub structured_data: StructuredDataFacts,
    pub social: SocialFacts,
    pub integrations: IntegrationFacts,
    pub performance: PerformanceFacts,
    pub resources: ResourceFacts,
    /// Present once discovered links have been checked
    pub link_health: Option<LinkHealthSummary>,
    pub rendering: RenderingFacts,
}

impl ScrapedFactSet {
    pub fn with_link_health(mut self, summary: LinkHealthSummary) -> Self {
        self.link_health = Some(summary);
        self
    }

    pub fn with_rendering(mut self, rendering: RenderingFacts) -> Self {
        self.rendering = rendering;
        self
    }
}

/// Extracts the full fact-set from a document
///
/// # Arguments
///
/// * `html` - The resolved document (static or rendered)
/// * `url` - The page URL, used to resolve relative references
/// * `response` - Timing and headers of the HTTP response, when known
pub fn extract(html: &str, url: &Url, response: Option<&ResponseContext>) -> ScrapedFactSet {
    let document = Html::parse_document(html);
    let text = visible_text(&document);

    let facts = ScrapedFactSet {
        url: url.to_string(),
        analyzed_at: Utc::now(),
        title: title::extract(&document),
        meta: meta::extract(&document),
        headings: headings::extract(&document),
        images: images::extract(&document, url),
        content: content::extract(&document, &text),
        keywords: keyword_density(&text),
        links: links::extract(&document, url),
        technical: technical::extract(&document, html, url),
        mobile: mobile::extract(&document),
        security: security::extract(&document, url, response),
        structured_data: structured::extract(&document),
        social: social::extract(&document),
        integrations: integrations::extract(&document),
        performance: performance::extract(&document, html, response),
        resources: resources::extract(&document, url),
        link_health: None,
        rendering: RenderingFacts::default(),
    };

    tracing::debug!(
        "Extracted {} words, {} links, {} images from {}",
        facts.content.word_count,
        facts.links.links.len(),
        facts.images.total,
        url
    );

    facts
}

/// Whitespace-collapsed text content of an element
pub(crate) fn element_text(element: &ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Contents of every `<meta>` whose `name` or `property` equals `key`,
/// compared case-insensitively
pub(crate) fn meta_contents<'a>(document: &'a Html, key: &'a str) -> impl Iterator<Item = &'a str> {
    document.select(selector!("meta[content]")).filter_map(move |meta| {
        let element = meta.value();
        let named = element
            .attr("name")
            .or_else(|| element.attr("property"))
            .map_or(false, |name| name.trim().eq_ignore_ascii_case(key));
        if named {
            element.attr("content")
        } else {
            None
        }
    })
}

/// Whether a `rel` attribute value contains `token`
pub(crate) fn rel_contains(rel: Option<&str>, token: &str) -> bool {
    rel.map_or(false, |rel| {
        rel.split_whitespace().any(|t| t.eq_ignore_ascii_case(token))
    })
}

const NON_CONTENT_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "svg"];

/// Readable body text with scripts, styles and similar elements removed
pub(crate) fn visible_text(document: &Html) -> String {
    let root = document
        .select(selector!("body"))
        .next()
        .unwrap_or_else(|| document.root_element());

    let mut parts = Vec::new();
    for node in root.descendants() {
        if let Node::Text(text) = node.value() {
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .map_or(false, |e| NON_CONTENT_ELEMENTS.contains(&e.name()))
            });
            if !hidden {
                parts.push(&**text);
            }
        }
    }

    collapse_whitespace(&parts.join(" "))
}
