use crate::extract::{meta_contents, rel_contains};
use crate::url::{normalize_url, resolve_href};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use serde::{Deserialize, Serialize};
use url::Url;

static DOCTYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)^\x{FEFF}?\s*(<!--.*?-->\s*)*<!doctype\s+html").expect("valid regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hreflang {
    pub lang: String,
    pub href: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicalFacts {
    pub has_canonical: bool,
    /// Absolute canonical URL
    pub canonical: Option<String>,
    /// Whether the canonical URL is this page after normalization
    pub canonical_is_self: bool,
    pub hreflang: Vec<Hreflang>,
    pub has_favicon: bool,
    pub favicon: Option<String>,
    pub has_doctype: bool,
    pub robots_meta: Option<String>,
}

pub(crate) fn extract(document: &Html, html: &str, page: &Url) -> TechnicalFacts {
    let canonical = document
        .select(selector!("link[rel][href]"))
        .filter(|link| rel_contains(link.value().attr("rel"), "canonical"))
        .find_map(|link| resolve_href(link.value().attr("href")?, page));

    let canonical_is_self = canonical.as_ref().map_or(false, |c| {
        match (normalize_url(c.as_str()), normalize_url(page.as_str())) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    });

    let hreflang = document
        .select(selector!("link[hreflang][href]"))
        .filter(|link| rel_contains(link.value().attr("rel"), "alternate"))
        .filter_map(|link| {
            let element = link.value();
            Some(Hreflang {
                lang: element.attr("hreflang")?.trim().to_string(),
                href: resolve_href(element.attr("href")?, page)?.to_string(),
            })
        })
        .collect();

    let favicon = document
        .select(selector!("link[rel][href]"))
        .filter(|link| rel_contains(link.value().attr("rel"), "icon"))
        .find_map(|link| resolve_href(link.value().attr("href")?, page))
        .map(|u| u.to_string());

    TechnicalFacts {
        has_canonical: canonical.is_some(),
        canonical: canonical.map(|c| c.to_string()),
        canonical_is_self,
        hreflang,
        has_favicon: favicon.is_some(),
        favicon,
        has_doctype: DOCTYPE.is_match(html),
        robots_meta: meta_contents(document, "robots")
            .next()
            .map(|r| r.trim().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn technical_of(html: &str) -> TechnicalFacts {
        extract(
            &Html::parse_document(html),
            html,
            &Url::parse("https://example.com/page").unwrap(),
        )
    }

    #[test]
    fn test_self_referencing_canonical() {
        let facts = technical_of(r#"<link rel="canonical" href="https://EXAMPLE.com/page#top">"#);
        assert!(facts.has_canonical);
        assert!(facts.canonical_is_self);

        let relative = technical_of(r#"<link rel="canonical" href="/page">"#);
        assert!(relative.canonical_is_self);

        let other = technical_of(r#"<link rel="canonical" href="/other">"#);
        assert_eq!(other.canonical.as_deref(), Some("https://example.com/other"));
        assert!(!other.canonical_is_self);
    }

    #[test]
    fn test_hreflang_and_favicon() {
        let facts = technical_of(
            r#"<link rel="alternate" hreflang="de" href="/de/page">
               <link rel="alternate" hreflang="x-default" href="https://example.com/page">
               <link rel="shortcut icon" href="/favicon.ico">"#,
        );
        assert_eq!(facts.hreflang.len(), 2);
        assert_eq!(facts.hreflang[0].lang, "de");
        assert_eq!(facts.hreflang[0].href, "https://example.com/de/page");
        assert!(facts.has_favicon);
        assert_eq!(facts.favicon.as_deref(), Some("https://example.com/favicon.ico"));
    }

    #[test]
    fn test_apple_touch_icon_is_not_a_favicon() {
        let facts = technical_of(r#"<link rel="apple-touch-icon" href="/icon.png">"#);
        assert!(!facts.has_favicon);
    }

    #[test]
    fn test_doctype_detection() {
        assert!(technical_of("<!DOCTYPE html><html></html>").has_doctype);
        assert!(technical_of("  <!-- build 42 -->\n<!doctype HTML><html></html>").has_doctype);
        assert!(!technical_of("<html></html>").has_doctype);
    }

    #[test]
    fn test_missing_canonical() {
        let facts = technical_of("<p>plain</p>");
        assert!(!facts.has_canonical);
        assert!(!facts.canonical_is_self);
        assert_eq!(facts.robots_meta, None);
    }
}
