//! Technology signal table
//!
//! Signals are evaluated in table order and a later match overrides an
//! earlier one, so the table is grouped CMS → SPA → static generator and,
//! within a group, generic markers come before the more specific ones that
//! imply them (React before Next.js).

use crate::detector::profile::Framework;
use once_cell::sync::Lazy;
use regex::Regex;

/// Broad family a signal belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalGroup {
    Cms,
    Spa,
    StaticSite,
}

/// How a signal inspects the markup
#[derive(Debug, Clone, Copy)]
pub enum Probe {
    /// Any of the substrings occurs in the lower-cased markup
    AnyOf(&'static [&'static str]),
    /// The case-insensitive regex matches the raw markup
    Pattern(&'static str),
}

/// One `(probe, classification)` entry
#[derive(Debug, Clone, Copy)]
pub struct Signal {
    pub group: SignalGroup,
    pub framework: Framework,
    pub label: &'static str,
    pub probe: Probe,
}

pub const SIGNALS: &[Signal] = &[
    // ===== CMS and hosted builders =====
    Signal {
        group: SignalGroup::Cms,
        framework: Framework::WordPress,
        label: "wp-content/wp-includes assets",
        probe: Probe::AnyOf(&["/wp-content/", "/wp-includes/", "wp-json"]),
    },
    Signal {
        group: SignalGroup::Cms,
        framework: Framework::WordPress,
        label: "WordPress generator meta",
        probe: Probe::Pattern(r#"(?i)<meta[^>]+content=["']wordpress"#),
    },
    Signal {
        group: SignalGroup::Cms,
        framework: Framework::Drupal,
        label: "Drupal settings or files",
        probe: Probe::AnyOf(&["drupal.settings", "/sites/default/files/", "data-drupal-"]),
    },
    Signal {
        group: SignalGroup::Cms,
        framework: Framework::Joomla,
        label: "Joomla assets",
        probe: Probe::AnyOf(&["/media/jui/", "/components/com_", "joomla!"]),
    },
    Signal {
        group: SignalGroup::Cms,
        framework: Framework::Wix,
        label: "Wix static hosts",
        probe: Probe::AnyOf(&["static.wixstatic.com", "parastorage.com", "wix-code-public-path"]),
    },
    Signal {
        group: SignalGroup::Cms,
        framework: Framework::Squarespace,
        label: "Squarespace context",
        probe: Probe::AnyOf(&["static1.squarespace.com", "squarespace_context"]),
    },
    Signal {
        group: SignalGroup::Cms,
        framework: Framework::Shopify,
        label: "Shopify storefront assets",
        probe: Probe::AnyOf(&["cdn.shopify.com", "shopify.theme", "shopify-section"]),
    },
    // ===== SPA frameworks =====
    Signal {
        group: SignalGroup::Spa,
        framework: Framework::React,
        label: "React root or runtime",
        probe: Probe::AnyOf(&["data-reactroot", "react-dom", "__react_devtools", "_reactlistening"]),
    },
    Signal {
        group: SignalGroup::Spa,
        framework: Framework::Vue,
        label: "Vue runtime or scoped attributes",
        probe: Probe::Pattern(r"(?i)(vue(\.runtime)?(\.min)?\.js|data-v-[0-9a-f]{6,}|data-server-rendered)"),
    },
    Signal {
        group: SignalGroup::Spa,
        framework: Framework::Angular,
        label: "Angular root or version attribute",
        probe: Probe::AnyOf(&["ng-version", "<app-root", "ng-app"]),
    },
    Signal {
        group: SignalGroup::Spa,
        framework: Framework::Gatsby,
        label: "Gatsby root",
        probe: Probe::AnyOf(&["id=\"___gatsby\"", "gatsby-"]),
    },
    Signal {
        group: SignalGroup::Spa,
        framework: Framework::Nuxt,
        label: "Nuxt root or state",
        probe: Probe::AnyOf(&["id=\"__nuxt\"", "window.__nuxt__", "/_nuxt/"]),
    },
    Signal {
        group: SignalGroup::Spa,
        framework: Framework::NextJs,
        label: "Next.js data or assets",
        probe: Probe::AnyOf(&["id=\"__next\"", "__next_data__", "/_next/static"]),
    },
    // ===== Static site generators =====
    Signal {
        group: SignalGroup::StaticSite,
        framework: Framework::Hugo,
        label: "Hugo generator meta",
        probe: Probe::Pattern(r#"(?i)<meta[^>]+content=["']hugo"#),
    },
    Signal {
        group: SignalGroup::StaticSite,
        framework: Framework::Jekyll,
        label: "Jekyll generator meta",
        probe: Probe::Pattern(r#"(?i)<meta[^>]+content=["']jekyll"#),
    },
    Signal {
        group: SignalGroup::StaticSite,
        framework: Framework::Eleventy,
        label: "Eleventy generator meta",
        probe: Probe::Pattern(r#"(?i)<meta[^>]+content=["']eleventy"#),
    },
];

/// Markers of page-builder plugins on CMS pages
pub const CMS_PLUGIN_MARKERS: &[&str] = &[
    "elementor",
    "et_pb_",
    "vc_row",
    "wpbakery",
    "woocommerce",
    "wp-block-",
];

/// Markers of an empty container an SPA mounts into
pub const SPA_ROOT_MARKERS: &[&str] = &[
    "id=\"root\"",
    "id=\"app\"",
    "id=\"__next\"",
    "id=\"__nuxt\"",
    "id='root'",
    "id='app'",
    "<app-root",
    "ng-app",
];

/// Markers of infinite scrolling
pub const INFINITE_SCROLL_MARKERS: &[&str] =
    &["infinite-scroll", "infinitescroll", "data-infinite", "load-more-on-scroll"];

/// Markers of lazy-loaded media
pub const LAZY_LOAD_MARKERS: &[&str] = &["loading=\"lazy\"", "loading='lazy'", "lazyload", "data-src="];

static COMPILED: Lazy<Vec<Option<Regex>>> = Lazy::new(|| {
    SIGNALS
        .iter()
        .map(|signal| match signal.probe {
            Probe::Pattern(pattern) => Regex::new(pattern).ok(),
            Probe::AnyOf(_) => None,
        })
        .collect()
});

impl Signal {
    /// Tests the signal against markup
    ///
    /// `lower` must be the lower-cased form of `html`.
    pub fn matches(&self, index: usize, html: &str, lower: &str) -> bool {
        match self.probe {
            Probe::AnyOf(needles) => needles.iter().any(|needle| lower.contains(needle)),
            Probe::Pattern(_) => COMPILED
                .get(index)
                .and_then(Option::as_ref)
                .map_or(false, |re| re.is_match(html)),
        }
    }
}

/// Returns true if any marker occurs in the lower-cased markup
pub fn contains_any(lower: &str, markers: &[&str]) -> bool {
    markers.iter().any(|marker| lower.contains(marker))
}
