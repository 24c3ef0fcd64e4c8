use crate::url::resolve_href;
use scraper::Html;
use serde::{Deserialize, Serialize};
use url::Url;

/// Alt text longer than this is reported
const MAX_ALT_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    /// Absolute URL when resolvable, otherwise the raw attribute
    pub src: String,
    pub alt: Option<String>,
    pub has_alt: bool,
    pub has_title: bool,
    pub alt_length: usize,
    pub lazy: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageFacts {
    pub images: Vec<ImageInfo>,
    pub total: usize,
    pub with_alt: usize,
    pub without_alt: usize,
    pub lazy_loaded: usize,
    pub issues: Vec<String>,
}

impl ImageFacts {
    /// Share of images with non-empty alt text, `None` without images
    pub fn alt_coverage(&self) -> Option<f64> {
        (self.total > 0).then(|| self.with_alt as f64 / self.total as f64)
    }
}

pub(crate) fn extract(document: &Html, page: &Url) -> ImageFacts {
    let mut facts = ImageFacts::default();

    for img in document.select(selector!("img")) {
        let element = img.value();
        let raw_src = element
            .attr("src")
            .or_else(|| element.attr("data-src"))
            .unwrap_or("")
            .trim();
        let src = resolve_href(raw_src, page)
            .map(|u| u.to_string())
            .unwrap_or_else(|| raw_src.to_string());

        let alt = element.attr("alt").map(|a| a.trim().to_string());
        let alt_length = alt.as_deref().map_or(0, |a| a.chars().count());
        let has_alt = alt_length > 0;
        let lazy = element
            .attr("loading")
            .map_or(false, |l| l.eq_ignore_ascii_case("lazy"))
            || element.attr("data-src").is_some();

        if alt_length > MAX_ALT_LENGTH {
            facts.issues.push(format!(
                "Alt text exceeds {} characters ({}): {}",
                MAX_ALT_LENGTH, alt_length, src
            ));
        }

        facts.total += 1;
        if has_alt {
            facts.with_alt += 1;
        } else {
            facts.without_alt += 1;
        }
        if lazy {
            facts.lazy_loaded += 1;
        }

        facts.images.push(ImageInfo {
            src,
            alt,
            has_alt,
            has_title: element.attr("title").map_or(false, |t| !t.trim().is_empty()),
            alt_length,
            lazy,
        });
    }

    facts
}
