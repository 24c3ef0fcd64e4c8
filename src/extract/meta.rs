use crate::extract::meta_contents;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use serde::{Deserialize, Serialize};

static CHARSET_PARAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)charset\s*=\s*([\w-]+)").expect("valid regex"));

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaFacts {
    pub description: Option<String>,
    pub description_length: usize,
    /// Number of description tags; more than one is a duplicate
    pub description_count: usize,
    pub keywords: Vec<String>,
    pub robots: Option<String>,
    pub noindex: bool,
    pub nofollow: bool,
    pub charset: Option<String>,
    pub language: Option<String>,
}

impl MetaFacts {
    pub fn has_duplicate_description(&self) -> bool {
        self.description_count > 1
    }
}

pub(crate) fn extract(document: &Html) -> MetaFacts {
    let descriptions: Vec<&str> = meta_contents(document, "description").collect();
    let description = descriptions
        .iter()
        .map(|d| d.trim())
        .find(|d| !d.is_empty())
        .map(str::to_string);

    let keywords = meta_contents(document, "keywords")
        .flat_map(|k| k.split(','))
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect();

    let robots = meta_contents(document, "robots")
        .next()
        .map(|r| r.trim().to_lowercase());
    let directives: Vec<&str> = robots
        .as_deref()
        .map(|r| r.split(',').map(str::trim).collect())
        .unwrap_or_default();
    let noindex = directives.iter().any(|d| *d == "noindex" || *d == "none");
    let nofollow = directives.iter().any(|d| *d == "nofollow" || *d == "none");

    let charset = document
        .select(selector!("meta[charset]"))
        .next()
        .and_then(|m| m.value().attr("charset"))
        .map(|c| c.trim().to_lowercase())
        .or_else(|| {
            document
                .select(selector!("meta[http-equiv][content]"))
                .filter(|m| {
                    m.value()
                        .attr("http-equiv")
                        .map_or(false, |h| h.eq_ignore_ascii_case("content-type"))
                })
                .find_map(|m| {
                    let content = m.value().attr("content")?;
                    CHARSET_PARAM
                        .captures(content)
                        .map(|c| c[1].to_lowercase())
                })
        });

    let language = document
        .select(selector!("html[lang]"))
        .next()
        .and_then(|h| h.value().attr("lang"))
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty());

    MetaFacts {
        description_length: description.as_deref().map_or(0, |d| d.chars().count()),
        description,
        description_count: descriptions.len(),
        keywords,
        noindex,
        nofollow,
        robots,
        charset,
        language,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta_of(html: &str) -> MetaFacts {
        extract(&Html::parse_document(html))
    }

    #[test]
    fn test_description_and_duplicates() {
        let facts = meta_of(
            r#"<meta name="description" content=" First "><meta name="description" content="Second">"#,
        );
        assert_eq!(facts.description.as_deref(), Some("First"));
        assert_eq!(facts.description_length, 5);
        assert!(facts.has_duplicate_description());
    }

    #[test]
    fn test_robots_directives() {
        let facts = meta_of(r#"<meta name="robots" content="NoIndex, follow">"#);
        assert!(facts.noindex);
        assert!(!facts.nofollow);

        let none = meta_of(r#"<meta name="robots" content="none">"#);
        assert!(none.noindex && none.nofollow);
    }

    #[test]
    fn test_keywords_charset_language() {
        let facts = meta_of(
            r#"<html lang="en-GB"><head><meta http-equiv="Content-Type" content="text/html; charset=ISO-8859-1">
               <meta name="keywords" content="mugs, bowls,, ceramics"></head></html>"#,
        );
        assert_eq!(facts.keywords, vec!["mugs", "bowls", "ceramics"]);
        assert_eq!(facts.charset.as_deref(), Some("iso-8859-1"));
        assert_eq!(facts.language.as_deref(), Some("en-GB"));
    }

    #[test]
    fn test_missing_everything() {
        let facts = meta_of("<p>bare</p>");
        assert_eq!(facts.description, None);
        assert_eq!(facts.description_count, 0);
        assert!(!facts.noindex);
        assert_eq!(facts.charset, None);
    }
}
