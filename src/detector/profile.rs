//! Site profile types produced by the technology detector

use serde::{Deserialize, Serialize};
use std::fmt;

/// The framework or CMS that produced a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    // ===== CMS and hosted builders =====
    WordPress,
    Drupal,
    Joomla,
    Wix,
    Squarespace,
    Shopify,

    // ===== SPA frameworks =====
    React,
    Vue,
    Angular,
    Gatsby,
    Nuxt,
    NextJs,

    // ===== Static site generators =====
    Hugo,
    Jekyll,
    Eleventy,

    Unknown,
}

impl Framework {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WordPress => "WordPress",
            Self::Drupal => "Drupal",
            Self::Joomla => "Joomla",
            Self::Wix => "Wix",
            Self::Squarespace => "Squarespace",
            Self::Shopify => "Shopify",
            Self::React => "React",
            Self::Vue => "Vue.js",
            Self::Angular => "Angular",
            Self::Gatsby => "Gatsby",
            Self::Nuxt => "Nuxt.js",
            Self::NextJs => "Next.js",
            Self::Hugo => "Hugo",
            Self::Jekyll => "Jekyll",
            Self::Eleventy => "Eleventy",
            Self::Unknown => "Unknown",
        }
    }

    /// Content management systems and hosted site builders
    pub fn is_cms(&self) -> bool {
        matches!(
            self,
            Self::WordPress | Self::Drupal | Self::Joomla | Self::Wix | Self::Squarespace
        )
    }

    /// Frameworks whose content only exists after script execution
    pub fn is_spa(&self) -> bool {
        matches!(
            self,
            Self::React | Self::Vue | Self::Angular | Self::Nuxt | Self::NextJs
        )
    }

    /// E-commerce storefront platforms
    pub fn is_storefront(&self) -> bool {
        matches!(self, Self::Shopify)
    }

    pub fn rendering_method(&self) -> RenderingMethod {
        match self {
            Self::NextJs | Self::Nuxt => RenderingMethod::Hybrid,
            Self::React | Self::Vue | Self::Angular => RenderingMethod::Csr,
            Self::WordPress
            | Self::Drupal
            | Self::Joomla
            | Self::Wix
            | Self::Squarespace
            | Self::Shopify => RenderingMethod::Ssr,
            Self::Gatsby | Self::Hugo | Self::Jekyll | Self::Eleventy | Self::Unknown => {
                RenderingMethod::Static
            }
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where the page's markup is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderingMethod {
    /// Server-side rendered
    Ssr,
    /// Client-side rendered
    Csr,
    /// Pre-built static files
    Static,
    /// Server-rendered shell hydrated on the client
    Hybrid,
}

/// How heavy the page is to load and render
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

/// How the renderer should obtain the final document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStrategy {
    /// Use the HTTP response as-is
    Static,
    /// Always execute the page in a headless browser
    Headless,
    /// Use static HTML unless it looks incomplete
    Hybrid,
}

impl fmt::Display for FetchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Static => "static",
            Self::Headless => "headless",
            Self::Hybrid => "hybrid",
        };
        write!(f, "{}", s)
    }
}

/// The detector's classification of a site's rendering technology
///
/// Produced once per domain and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteProfile {
    pub framework: Framework,
    pub rendering_method: RenderingMethod,
    pub needs_js_rendering: bool,
    pub complexity: Complexity,
    pub recommended_strategy: FetchStrategy,
    /// Human-readable evidence for the classification
    pub signals: Vec<String>,
}

impl SiteProfile {
    /// Profile used when nothing about the site is known
    pub fn unknown() -> Self {
        Self {
            framework: Framework::Unknown,
            rendering_method: RenderingMethod::Static,
            needs_js_rendering: false,
            complexity: Complexity::Low,
            recommended_strategy: FetchStrategy::Static,
            signals: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spa_frameworks() {
        for fw in [
            Framework::React,
            Framework::Vue,
            Framework::Angular,
            Framework::NextJs,
            Framework::Nuxt,
        ] {
            assert!(fw.is_spa(), "{fw}");
            assert!(!fw.is_cms(), "{fw}");
        }
        assert!(!Framework::Gatsby.is_spa());
        assert!(!Framework::Unknown.is_spa());
    }

    #[test]
    fn test_rendering_methods() {
        assert_eq!(Framework::NextJs.rendering_method(), RenderingMethod::Hybrid);
        assert_eq!(Framework::React.rendering_method(), RenderingMethod::Csr);
        assert_eq!(Framework::WordPress.rendering_method(), RenderingMethod::Ssr);
        assert_eq!(Framework::Hugo.rendering_method(), RenderingMethod::Static);
    }

    #[test]
    fn test_profile_serializes_lowercase() {
        let json = serde_json::to_string(&SiteProfile::unknown()).unwrap();
        assert!(json.contains("\"framework\":\"unknown\""));
        assert!(json.contains("\"recommended_strategy\":\"static\""));
    }

    #[test]
    fn test_complexity_ordering() {
        assert!(Complexity::High > Complexity::Medium);
        assert!(Complexity::Medium > Complexity::Low);
    }
}
