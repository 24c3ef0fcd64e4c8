use crate::extract::element_text;
use scraper::Html;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub level: u8,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingFacts {
    /// Every h1-h6 in document order
    pub headings: Vec<Heading>,
    /// Heading texts keyed by level
    pub by_level: BTreeMap<u8, Vec<String>>,
    /// Whether the outline jumps down more than one level somewhere
    pub skipped_levels: bool,
    pub issues: Vec<String>,
}

impl HeadingFacts {
    pub fn count(&self, level: u8) -> usize {
        self.by_level.get(&level).map_or(0, Vec::len)
    }

    pub fn h1_count(&self) -> usize {
        self.count(1)
    }
}

pub(crate) fn extract(document: &Html) -> HeadingFacts {
    let headings: Vec<Heading> = document
        .select(selector!("h1, h2, h3, h4, h5, h6"))
        .filter_map(|el| {
            let level = el.value().name().strip_prefix('h')?.parse().ok()?;
            Some(Heading {
                level,
                text: element_text(&el),
            })
        })
        .collect();

    let mut by_level: BTreeMap<u8, Vec<String>> = BTreeMap::new();
    for heading in &headings {
        by_level
            .entry(heading.level)
            .or_default()
            .push(heading.text.clone());
    }

    let mut issues = Vec::new();
    let h1_count = by_level.get(&1).map_or(0, Vec::len);
    match h1_count {
        0 => issues.push("No H1 tag found".to_string()),
        1 => {}
        n => issues.push(format!("Multiple H1 tags found ({})", n)),
    }

    let mut skipped_levels = false;
    for pair in headings.windows(2) {
        let (prev, next) = (pair[0].level, pair[1].level);
        if next > prev + 1 {
            skipped_levels = true;
            issues.push(format!("Heading level skipped (h{} to h{})", prev, next));
        }
    }

    HeadingFacts {
        headings,
        by_level,
        skipped_levels,
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headings_of(html: &str) -> HeadingFacts {
        extract(&Html::parse_document(html))
    }

    #[test]
    fn test_order_and_levels_preserved() {
        let facts = headings_of("<h1>A</h1><h2>B</h2><h3>C</h3><h2>D</h2>");
        let levels: Vec<u8> = facts.headings.iter().map(|h| h.level).collect();
        assert_eq!(levels, vec![1, 2, 3, 2]);
        assert_eq!(facts.by_level[&2], vec!["B", "D"]);
        assert!(facts.issues.is_empty());
        assert!(!facts.skipped_levels);
    }

    #[test]
    fn test_missing_h1() {
        let facts = headings_of("<h2>Only a subheading</h2>");
        assert_eq!(facts.issues, vec!["No H1 tag found".to_string()]);
    }

    #[test]
    fn test_multiple_h1() {
        let facts = headings_of("<h1>One</h1><h1>Two</h1><h1>Three</h1>");
        assert_eq!(facts.h1_count(), 3);
        assert_eq!(facts.issues, vec!["Multiple H1 tags found (3)".to_string()]);
    }

    #[test]
    fn test_skipped_level() {
        let facts = headings_of("<h1>Top</h1><h4>Deep</h4>");
        assert!(facts.skipped_levels);
        assert_eq!(facts.issues, vec!["Heading level skipped (h1 to h4)".to_string()]);
    }

    #[test]
    fn test_heading_text_is_collapsed() {
        let facts = headings_of("<h1>  Hello <span>big</span>\n world </h1>");
        assert_eq!(facts.headings[0].text, "Hello big world");
    }
}
