use crate::extract::{element_text, meta_contents};
use scraper::Html;
use serde::{Deserialize, Serialize};

/// Where the page title was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleSource {
    Title,
    OpenGraph,
    MetaTitle,
    Heading,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleFacts {
    pub text: Option<String>,
    pub source: Option<TitleSource>,
    /// Length in characters; zero when there is no title
    pub length: usize,
}

impl TitleFacts {
    /// Whether the title length is within 30 to 60 characters
    pub fn has_good_length(&self) -> bool {
        self.text.is_some() && (30..=60).contains(&self.length)
    }
}

/// `<title>`, then `og:title`, then `meta[name=title]`, then the first heading
pub(crate) fn extract(document: &Html) -> TitleFacts {
    let candidates = [
        (
            TitleSource::Title,
            document
                .select(selector!("title"))
                .next()
                .map(|el| element_text(&el)),
        ),
        (
            TitleSource::OpenGraph,
            meta_contents(document, "og:title").next().map(str::to_string),
        ),
        (
            TitleSource::MetaTitle,
            meta_contents(document, "title").next().map(str::to_string),
        ),
        (
            TitleSource::Heading,
            document
                .select(selector!("h1, h2, h3, h4, h5, h6"))
                .next()
                .map(|el| element_text(&el)),
        ),
    ];

    candidates
        .into_iter()
        .find_map(|(source, text)| {
            text.map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .map(|t| (source, t))
        })
        .map(|(source, text)| TitleFacts {
            length: text.chars().count(),
            text: Some(text),
            source: Some(source),
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title_of(html: &str) -> TitleFacts {
        extract(&Html::parse_document(html))
    }

    #[test]
    fn test_title_tag_wins() {
        let facts = title_of(
            r#"<title>  Real title </title><meta property="og:title" content="OG"><h1>Heading</h1>"#,
        );
        assert_eq!(facts.text.as_deref(), Some("Real title"));
        assert_eq!(facts.source, Some(TitleSource::Title));
        assert_eq!(facts.length, 10);
    }

    #[test]
    fn test_fallback_chain() {
        let og = title_of(r#"<title> </title><meta property="og:title" content="OG title">"#);
        assert_eq!(og.source, Some(TitleSource::OpenGraph));

        let meta = title_of(r#"<meta name="title" content="Meta title"><h2>Sub</h2>"#);
        assert_eq!(meta.source, Some(TitleSource::MetaTitle));

        let heading = title_of(r#"<body><h2>First</h2><h1>Second</h1></body>"#);
        assert_eq!(heading.text.as_deref(), Some("First"));
        assert_eq!(heading.source, Some(TitleSource::Heading));
    }

    #[test]
    fn test_missing_title() {
        let facts = title_of("<p>No title anywhere</p>");
        assert_eq!(facts, TitleFacts::default());
        assert!(!facts.has_good_length());
    }

    #[test]
    fn test_length_window() {
        let facts = title_of(&format!("<title>{}</title>", "a".repeat(45)));
        assert!(facts.has_good_length());
        let facts = title_of(&format!("<title>{}</title>", "a".repeat(61)));
        assert!(!facts.has_good_length());
    }
}
