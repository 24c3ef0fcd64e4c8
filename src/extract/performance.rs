use crate::extract::{rel_contains, ResponseContext};
use scraper::Html;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceFacts {
    /// Time to the initial response, when it was measured
    pub response_time_ms: Option<u64>,
    pub html_bytes: usize,
    pub script_count: usize,
    pub external_script_count: usize,
    pub stylesheet_count: usize,
    pub inline_style_count: usize,
    /// `Content-Encoding` of the initial response
    pub compression: Option<String>,
}

pub(crate) fn extract(
    document: &Html,
    html: &str,
    response: Option<&ResponseContext>,
) -> PerformanceFacts {
    let scripts: Vec<_> = document.select(selector!("script")).collect();
    let external_script_count = scripts
        .iter()
        .filter(|s| s.value().attr("src").is_some())
        .count();

    let stylesheet_count = document
        .select(selector!("link[rel][href]"))
        .filter(|l| rel_contains(l.value().attr("rel"), "stylesheet"))
        .count();

    PerformanceFacts {
        response_time_ms: response.map(|r| r.response_time_ms),
        html_bytes: html.len(),
        script_count: scripts.len(),
        external_script_count,
        stylesheet_count,
        inline_style_count: document.select(selector!("style")).count(),
        compression: response
            .and_then(|r| r.header("content-encoding"))
            .map(|c| c.trim().to_ascii_lowercase())
            .filter(|c| !c.is_empty() && c != "identity"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const HTML: &str = r#"<link rel="stylesheet" href="a.css"><link rel="preload" href="b.css">
        <style>p{}</style><script src="a.js"></script><script>inline()</script>"#;

    #[test]
    fn test_counts_without_response() {
        let facts = extract(&Html::parse_document(HTML), HTML, None);
        assert_eq!(facts.script_count, 2);
        assert_eq!(facts.external_script_count, 1);
        assert_eq!(facts.stylesheet_count, 1);
        assert_eq!(facts.inline_style_count, 1);
        assert_eq!(facts.html_bytes, HTML.len());
        assert_eq!(facts.response_time_ms, None);
        assert_eq!(facts.compression, None);
    }

    #[test]
    fn test_response_timing_and_compression() {
        let response = ResponseContext {
            status: 200,
            response_time_ms: 850,
            headers: HashMap::from([("content-encoding".to_string(), "GZIP".to_string())]),
        };
        let facts = extract(&Html::parse_document(HTML), HTML, Some(&response));
        assert_eq!(facts.response_time_ms, Some(850));
        assert_eq!(facts.compression.as_deref(), Some("gzip"));
    }
}
