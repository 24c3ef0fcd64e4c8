use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use serde::{Deserialize, Serialize};

static GA_UNIVERSAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bUA-\d{4,10}-\d{1,4}\b").expect("valid regex"));
static GA4: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(gtag/js\?id=G-[A-Z0-9]{4,}|['"]config['"]\s*,\s*['"]G-[A-Z0-9]{4,})"#)
        .expect("valid regex")
});
static GTM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(googletagmanager\.com/gtm\.js|\bGTM-[A-Z0-9]{4,}\b)").expect("valid regex")
});

/// Third-party trackers other than the ones with dedicated flags, as
/// `(name, lower-case markers)`
const OTHER_TRACKERS: &[(&str, &[&str])] = &[
    ("Microsoft Clarity", &["clarity.ms"]),
    ("Segment", &["cdn.segment.com", "analytics.load("]),
    ("Mixpanel", &["cdn.mxpnl.com", "mixpanel.init"]),
    ("LinkedIn Insight", &["snap.licdn.com", "_linkedin_partner_id"]),
    ("TikTok Pixel", &["analytics.tiktok.com", "ttq.load"]),
    ("Pinterest Tag", &["s.pinimg.com/ct/core.js", "pintrk("]),
    ("HubSpot", &["js.hs-scripts.com", "js.hs-analytics.net"]),
    ("Intercom", &["widget.intercom.io"]),
    ("Plausible", &["plausible.io/js"]),
    ("Matomo", &["matomo.js", "piwik.js", "_paq.push"]),
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationFacts {
    pub google_analytics_universal: bool,
    pub google_analytics_ga4: bool,
    pub google_tag_manager: bool,
    pub facebook_pixel: bool,
    pub hotjar: bool,
    pub others: Vec<String>,
}

impl IntegrationFacts {
    /// Names of every detected integration
    pub fn detected(&self) -> Vec<String> {
        let flags = [
            (self.google_analytics_universal, "Google Analytics (UA)"),
            (self.google_analytics_ga4, "Google Analytics 4"),
            (self.google_tag_manager, "Google Tag Manager"),
            (self.facebook_pixel, "Facebook Pixel"),
            (self.hotjar, "Hotjar"),
        ];
        flags
            .iter()
            .filter(|(on, _)| *on)
            .map(|(_, name)| name.to_string())
            .chain(self.others.iter().cloned())
            .collect()
    }
}

pub(crate) fn extract(document: &Html) -> IntegrationFacts {
    // Script sources and inline bodies, plus noscript fallbacks (GTM, Pixel)
    let mut haystack = String::new();
    for script in document.select(selector!("script, noscript")) {
        if let Some(src) = script.value().attr("src") {
            haystack.push_str(src);
            haystack.push('\n');
        }
        haystack.extend(script.text());
        haystack.push('\n');
    }
    let lower = haystack.to_lowercase();

    IntegrationFacts {
        google_analytics_universal: GA_UNIVERSAL.is_match(&haystack),
        google_analytics_ga4: GA4.is_match(&haystack),
        google_tag_manager: GTM.is_match(&haystack),
        facebook_pixel: (lower.contains("connect.facebook.net") && lower.contains("fbevents.js"))
            || lower.contains("fbq("),
        hotjar: lower.contains("static.hotjar.com") || lower.contains("_hjsettings"),
        others: OTHER_TRACKERS
            .iter()
            .filter(|(_, markers)| markers.iter().any(|m| lower.contains(m)))
            .map(|(name, _)| name.to_string())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn integrations_of(html: &str) -> IntegrationFacts {
        extract(&Html::parse_document(html))
    }

    #[test]
    fn test_google_products() {
        let facts = integrations_of(
            r#"<script async src="https://www.googletagmanager.com/gtag/js?id=G-ABC123XYZ"></script>
               <script>gtag('config', 'G-ABC123XYZ'); ga('create', 'UA-1234567-1');</script>
               <script>(function(w,d,s,l,i){})(window,document,'script','dataLayer','GTM-K9ZX2P');</script>"#,
        );
        assert!(facts.google_analytics_ga4);
        assert!(facts.google_analytics_universal);
        assert!(facts.google_tag_manager);
        assert!(!facts.facebook_pixel);
    }

    #[test]
    fn test_pixel_hotjar_and_others() {
        let facts = integrations_of(
            r#"<script>!function(f,b,e,v){}(window,document,'script','https://connect.facebook.net/en_US/fbevents.js'); fbq('init','1');</script>
               <script>(function(h,o,t,j,a,r){h._hjSettings={hjid:1};})(window,document,'https://static.hotjar.com/c/hotjar-','.js?sv=');</script>
               <script src="https://www.clarity.ms/tag/abc"></script>"#,
        );
        assert!(facts.facebook_pixel);
        assert!(facts.hotjar);
        assert_eq!(facts.others, vec!["Microsoft Clarity"]);
        assert_eq!(
            facts.detected(),
            vec!["Facebook Pixel", "Hotjar", "Microsoft Clarity"]
        );
    }

    #[test]
    fn test_body_text_is_not_probed() {
        let facts = integrations_of("<p>We do not use UA-1234567-1 or fbq( anywhere.</p>");
        assert_eq!(facts, IntegrationFacts::default());
    }
}
