use crate::extract::{element_text, rel_contains};
use crate::url::{classify_link, resolve_href, LinkScope};
use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkInfo {
    pub url: String,
    /// Anchor text, falling back to an inner image's alt or title, then the href
    pub text: String,
    pub scope: LinkScope,
    pub nofollow: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkFacts {
    pub links: Vec<LinkInfo>,
    pub internal_count: usize,
    pub external_count: usize,
    pub nofollow_count: usize,
    /// Anchors whose href is not a fetchable HTTP(S) target
    pub skipped_count: usize,
}

fn anchor_text(anchor: &ElementRef<'_>, href: &str) -> String {
    let text = element_text(anchor);
    if !text.is_empty() {
        return text;
    }

    anchor
        .select(selector!("img"))
        .find_map(|img| {
            let element = img.value();
            element
                .attr("alt")
                .or_else(|| element.attr("title"))
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| href.to_string())
}

pub(crate) fn extract(document: &Html, page: &Url) -> LinkFacts {
    let mut facts = LinkFacts::default();

    for anchor in document.select(selector!("a[href]")) {
        let href = anchor.value().attr("href").unwrap_or("").trim();
        let Some(target) = resolve_href(href, page) else {
            facts.skipped_count += 1;
            continue;
        };

        let scope = classify_link(&target, page);
        let nofollow = rel_contains(anchor.value().attr("rel"), "nofollow");

        match scope {
            LinkScope::Internal => facts.internal_count += 1,
            LinkScope::External => facts.external_count += 1,
        }
        if nofollow {
            facts.nofollow_count += 1;
        }

        facts.links.push(LinkInfo {
            url: target.to_string(),
            text: anchor_text(&anchor, href),
            scope,
            nofollow,
        });
    }

    facts
}
