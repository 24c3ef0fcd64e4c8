//! N-gram keyword density
//!
//! Tokens are the lower-cased words of the visible text with punctuation
//! removed. For every n from 1 to 6 the text is scanned with a sliding
//! window; a phrase needs at least two occurrences to be reported.

use crate::extract::content::round2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const MAX_NGRAM: usize = 6;
const MIN_OCCURRENCES: usize = 2;
const TOP_KEYWORDS: usize = 15;

const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for",
    "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself",
    "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just",
    "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once",
    "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same", "she",
    "should", "so", "some", "such", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those", "through", "to", "too",
    "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "would", "you", "your", "yours", "yourself",
    "yourselves",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub phrase: String,
    /// Number of words in the phrase
    pub n: usize,
    pub count: usize,
    /// `count / (tokens - n + 1) * 100`, two decimal places
    pub density: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordFacts {
    pub total_tokens: usize,
    pub keywords: Vec<Keyword>,
}

fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(&token)
}

fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric())
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .filter(|token| !token.is_empty())
        .collect()
}

fn is_candidate(window: &[String]) -> bool {
    match window {
        [single] => single.chars().count() > 2 && !is_stop_word(single),
        _ => !window.iter().all(|t| is_stop_word(t)),
    }
}

/// Computes the most frequent 1- to 6-word phrases in `text`
///
/// Results are ordered by count, then shorter phrases first, then by first
/// occurrence in the text.
///
/// # Examples
///
/// ```
/// use seoscope::extract::keyword_density;
///
/// let facts = keyword_density("seo tools are great seo tools");
/// assert_eq!(facts.keywords[0].phrase, "seo");
/// assert_eq!(facts.keywords[1].phrase, "tools");
/// assert_eq!(facts.keywords[0].density, 33.33);
/// ```
pub fn keyword_density(text: &str) -> KeywordFacts {
    let tokens = tokenize(text);
    let total = tokens.len();

    // phrase -> (n, count, first index)
    let mut counts: HashMap<String, (usize, usize, usize)> = HashMap::new();
    for n in 1..=MAX_NGRAM.min(total) {
        for (start, window) in tokens.windows(n).enumerate() {
            if !is_candidate(window) {
                continue;
            }
            counts
                .entry(window.join(" "))
                .and_modify(|entry| entry.1 += 1)
                .or_insert((n, 1, start));
        }
    }

    let mut ranked: Vec<(String, (usize, usize, usize))> = counts
        .into_iter()
        .filter(|(_, (_, count, _))| *count >= MIN_OCCURRENCES)
        .collect();
    ranked.sort_by(|(_, a), (_, b)| b.1.cmp(&a.1).then(a.0.cmp(&b.0)).then(a.2.cmp(&b.2)));
    ranked.truncate(TOP_KEYWORDS);

    let keywords = ranked
        .into_iter()
        .map(|(phrase, (n, count, _))| Keyword {
            phrase,
            n,
            count,
            density: round2(count as f64 / (total - n + 1) as f64 * 100.0),
        })
        .collect();

    KeywordFacts {
        total_tokens: total,
        keywords,
    }
}
