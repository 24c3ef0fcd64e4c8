use crate::extract::element_text;
use scraper::Html;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentFacts {
    pub word_count: usize,
    pub sentence_count: usize,
    pub paragraph_count: usize,
    pub avg_words_per_sentence: f64,
    /// `206.835 - 1.015 * words/sentences`, clamped to 0..=100; zero
    /// when the page has no sentences
    pub readability: f64,
}

pub(crate) fn extract(document: &Html, text: &str) -> ContentFacts {
    let word_count = text.split_whitespace().count();
    let sentence_count = count_sentences(text);
    let paragraph_count = document
        .select(selector!("p"))
        .filter(|p| !element_text(p).is_empty())
        .count();

    let (avg_words_per_sentence, readability) = if sentence_count == 0 {
        (0.0, 0.0)
    } else {
        let avg = word_count as f64 / sentence_count as f64;
        (round2(avg), round2(readability_score(avg)))
    };

    ContentFacts {
        word_count,
        sentence_count,
        paragraph_count,
        avg_words_per_sentence,
        readability,
    }
}

fn count_sentences(text: &str) -> usize {
    text.split(|c| matches!(c, '.' | '!' | '?'))
        .filter(|s| s.chars().any(char::is_alphanumeric))
        .count()
}

/// Reading ease from average sentence length, clamped to 0..=100
pub fn readability_score(avg_words_per_sentence: f64) -> f64 {
    (206.835 - 1.015 * avg_words_per_sentence).clamp(0.0, 100.0)
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content_of(html: &str) -> ContentFacts {
        let document = Html::parse_document(html);
        let text = crate::extract::visible_text(&document);
        extract(&document, &text)
    }

    #[test]
    fn test_counts() {
        let facts = content_of(
            "<p>The quick brown fox jumps. It runs away!</p><p>Does it stop?</p><p> </p>",
        );
        assert_eq!(facts.word_count, 11);
        assert_eq!(facts.sentence_count, 3);
        assert_eq!(facts.paragraph_count, 2);
        assert_eq!(facts.avg_words_per_sentence, 3.67);
    }

    #[test]
    fn test_readability_is_clamped() {
        assert_eq!(readability_score(1.0), 100.0);
        assert_eq!(readability_score(500.0), 0.0);
        assert_eq!(readability_score(100.0), 100.0);
        assert!((readability_score(150.0) - 54.585).abs() < 1e-9);
    }

    #[test]
    fn test_empty_page() {
        let facts = content_of("");
        assert_eq!(facts, ContentFacts::default());
    }
}
