use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A link that answered with a client or server error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokenLink {
    pub url: String,
    pub status: u16,
}

/// Aggregate link health for one page
///
/// Only 4xx/5xx answers count as broken; a link that could not be reached
/// is counted as unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkHealthSummary {
    pub checked: usize,
    pub ok: usize,
    pub redirects: usize,
    pub broken: Vec<BrokenLink>,
    pub unknown: usize,
}

impl LinkHealthSummary {
    pub fn from_results(results: &HashMap<String, Option<u16>>) -> Self {
        let mut summary = Self {
            checked: results.len(),
            ..Self::default()
        };

        for (url, status) in results {
            match status {
                None => summary.unknown += 1,
                Some(200..=299) => summary.ok += 1,
                Some(300..=399) => summary.redirects += 1,
                Some(code @ 400..=599) => summary.broken.push(BrokenLink {
                    url: url.clone(),
                    status: *code,
                }),
                Some(_) => summary.unknown += 1,
            }
        }

        summary.broken.sort_by(|a, b| a.url.cmp(&b.url));
        summary
    }

    pub fn broken_count(&self) -> usize {
        self.broken.len()
    }
}
