use crate::extract::{meta_contents, rel_contains};
use scraper::Html;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MobileFacts {
    pub has_viewport: bool,
    pub viewport: Option<String>,
    /// Viewport sets `width=device-width`
    pub viewport_correct: bool,
    /// `user-scalable=no` or `maximum-scale=1`
    pub zoom_disabled: bool,
    pub has_apple_touch_icon: bool,
}

impl MobileFacts {
    pub fn is_mobile_friendly(&self) -> bool {
        self.has_viewport && self.viewport_correct && !self.zoom_disabled
    }
}

fn viewport_directives(content: &str) -> Vec<(String, String)> {
    content
        .split([',', ';'])
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            Some((
                key.trim().to_ascii_lowercase(),
                value.trim().to_ascii_lowercase(),
            ))
        })
        .collect()
}

pub(crate) fn extract(document: &Html) -> MobileFacts {
    let viewport = meta_contents(document, "viewport")
        .next()
        .map(|v| v.trim().to_string());
    let directives = viewport.as_deref().map(viewport_directives).unwrap_or_default();

    let viewport_correct = directives
        .iter()
        .any(|(k, v)| k == "width" && v == "device-width");
    let zoom_disabled = directives.iter().any(|(k, v)| {
        (k == "user-scalable" && (v == "no" || v == "0"))
            || (k == "maximum-scale" && v.parse::<f64>().map_or(false, |scale| scale <= 1.0))
    });

    let has_apple_touch_icon = document
        .select(selector!("link[rel][href]"))
        .any(|link| rel_contains(link.value().attr("rel"), "apple-touch-icon"));

    MobileFacts {
        has_viewport: viewport.is_some(),
        viewport,
        viewport_correct,
        zoom_disabled,
        has_apple_touch_icon,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mobile_of(html: &str) -> MobileFacts {
        extract(&Html::parse_document(html))
    }

    #[test]
    fn test_correct_viewport() {
        let facts = mobile_of(r#"<meta name="viewport" content="width=device-width, initial-scale=1">"#);
        assert!(facts.has_viewport);
        assert!(facts.viewport_correct);
        assert!(!facts.zoom_disabled);
        assert!(facts.is_mobile_friendly());
    }

    #[test]
    fn test_zoom_disabled() {
        let no_scale = mobile_of(
            r#"<meta name="viewport" content="width=device-width, user-scalable=no">"#,
        );
        assert!(no_scale.zoom_disabled);
        assert!(!no_scale.is_mobile_friendly());

        let max_scale = mobile_of(
            r#"<meta name="viewport" content="width=device-width; maximum-scale=1.0">"#,
        );
        assert!(max_scale.zoom_disabled);
    }

    #[test]
    fn test_fixed_width_viewport() {
        let facts = mobile_of(r#"<meta name="viewport" content="width=1024">"#);
        assert!(facts.has_viewport);
        assert!(!facts.viewport_correct);
    }

    #[test]
    fn test_missing_viewport_and_touch_icon() {
        let facts = mobile_of(r#"<link rel="apple-touch-icon" href="/i.png">"#);
        assert!(!facts.has_viewport);
        assert!(facts.has_apple_touch_icon);
    }
}
