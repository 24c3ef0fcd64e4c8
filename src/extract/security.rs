use crate::extract::{rel_contains, ResponseContext};
use scraper::Html;
use serde::{Deserialize, Serialize};
use url::Url;

/// Elements and the attribute through which they load a subresource
const SUBRESOURCE_ATTRS: &[(&str, &str)] = &[
    ("img", "src"),
    ("script", "src"),
    ("iframe", "src"),
    ("video", "src"),
    ("audio", "src"),
    ("source", "src"),
    ("embed", "src"),
    ("object", "data"),
];

/// Security headers of the initial response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityHeaders {
    pub strict_transport_security: bool,
    pub content_security_policy: bool,
    pub x_frame_options: bool,
    pub x_content_type_options: bool,
}

impl SecurityHeaders {
    fn from_response(response: &ResponseContext) -> Self {
        Self {
            strict_transport_security: response.header("strict-transport-security").is_some(),
            content_security_policy: response.header("content-security-policy").is_some(),
            x_frame_options: response.header("x-frame-options").is_some(),
            x_content_type_options: response.header("x-content-type-options").is_some(),
        }
    }

    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.strict_transport_security {
            missing.push("Strict-Transport-Security");
        }
        if !self.content_security_policy {
            missing.push("Content-Security-Policy");
        }
        if !self.x_frame_options {
            missing.push("X-Frame-Options");
        }
        if !self.x_content_type_options {
            missing.push("X-Content-Type-Options");
        }
        missing
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityFacts {
    pub https: bool,
    /// `http://` subresources referenced from an HTTPS page
    pub mixed_content: Vec<String>,
    /// Present when response headers were available
    pub headers: Option<SecurityHeaders>,
}

impl SecurityFacts {
    pub fn has_mixed_content(&self) -> bool {
        !self.mixed_content.is_empty()
    }
}

fn insecure(value: &str) -> Option<String> {
    let value = value.trim();
    value
        .get(..7)
        .filter(|scheme| scheme.eq_ignore_ascii_case("http://"))
        .map(|_| value.to_string())
}

pub(crate) fn extract(document: &Html, page: &Url, response: Option<&ResponseContext>) -> SecurityFacts {
    let https = page.scheme() == "https";

    let mut mixed_content = Vec::new();
    if https {
        for element in document.select(selector!(
            "img[src], script[src], iframe[src], video[src], audio[src], source[src], embed[src], object[data], link[rel][href]"
        )) {
            let value = element.value();
            let attr = if value.name() == "link" {
                let loads = rel_contains(value.attr("rel"), "stylesheet")
                    || rel_contains(value.attr("rel"), "icon");
                loads.then(|| value.attr("href")).flatten()
            } else {
                SUBRESOURCE_ATTRS
                    .iter()
                    .find(|(name, _)| *name == value.name())
                    .and_then(|(_, attr)| value.attr(attr))
            };

            if let Some(url) = attr.and_then(insecure) {
                if !mixed_content.contains(&url) {
                    mixed_content.push(url);
                }
            }
        }
    }

    SecurityFacts {
        https,
        mixed_content,
        headers: response.map(SecurityHeaders::from_response),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn security_of(html: &str, page: &str, response: Option<&ResponseContext>) -> SecurityFacts {
        extract(&Html::parse_document(html), &Url::parse(page).unwrap(), response)
    }

    #[test]
    fn test_mixed_content_on_https() {
        let html = r#"<img src="http://cdn.example.com/a.png">
            <script src="HTTP://cdn.example.com/a.js"></script>
            <link rel="stylesheet" href="http://cdn.example.com/a.css">
            <a href="http://example.com/plain-link">not a subresource</a>
            <img src="https://cdn.example.com/ok.png">
            <img src="http://cdn.example.com/a.png">"#;
        let facts = security_of(html, "https://example.com/", None);

        assert!(facts.https);
        assert_eq!(facts.mixed_content.len(), 3);
        assert!(facts.has_mixed_content());
    }

    #[test]
    fn test_http_page_has_no_mixed_content() {
        let facts = security_of(r#"<img src="http://a.com/x.png">"#, "http://example.com/", None);
        assert!(!facts.https);
        assert!(facts.mixed_content.is_empty());
    }

    #[test]
    fn test_security_headers() {
        let headers: HashMap<String, String> = [
            ("strict-transport-security", "max-age=31536000"),
            ("x-frame-options", "DENY"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let response = ResponseContext {
            status: 200,
            response_time_ms: 10,
            headers,
        };

        let facts = security_of("", "https://example.com/", Some(&response));
        let headers = facts.headers.unwrap();
        assert!(headers.strict_transport_security);
        assert!(headers.x_frame_options);
        assert_eq!(
            headers.missing(),
            vec!["Content-Security-Policy", "X-Content-Type-Options"]
        );

        assert_eq!(security_of("", "https://example.com/", None).headers, None);
    }
}
