use scraper::Html;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredDataFacts {
    /// JSON-LD blocks that parsed
    pub json_ld_blocks: usize,
    /// JSON-LD blocks that did not parse and were skipped
    pub malformed_blocks: usize,
    /// Distinct `@type` values in first-seen order, including `@graph` members
    pub types: Vec<String>,
    pub microdata_types: Vec<String>,
    pub has_rdfa: bool,
}

impl StructuredDataFacts {
    pub fn has_structured_data(&self) -> bool {
        self.json_ld_blocks > 0 || !self.microdata_types.is_empty() || self.has_rdfa
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    let value = value.trim();
    if !value.is_empty() && !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

fn collect_types(value: &Value, types: &mut Vec<String>) {
    match value {
        Value::Array(items) => items.iter().for_each(|item| collect_types(item, types)),
        Value::Object(map) => {
            match map.get("@type") {
                Some(Value::String(t)) => push_unique(types, t),
                Some(Value::Array(ts)) => ts
                    .iter()
                    .filter_map(Value::as_str)
                    .for_each(|t| push_unique(types, t)),
                _ => {}
            }
            if let Some(graph) = map.get("@graph") {
                collect_types(graph, types);
            }
        }
        _ => {}
    }
}

pub(crate) fn extract(document: &Html) -> StructuredDataFacts {
    let mut facts = StructuredDataFacts::default();

    for script in document.select(selector!("script[type]")) {
        let is_json_ld = script
            .value()
            .attr("type")
            .map_or(false, |t| t.trim().eq_ignore_ascii_case("application/ld+json"));
        if !is_json_ld {
            continue;
        }

        let raw = script.text().collect::<String>();
        match serde_json::from_str::<Value>(raw.trim()) {
            Ok(value) => {
                facts.json_ld_blocks += 1;
                collect_types(&value, &mut facts.types);
            }
            Err(e) => {
                tracing::debug!("Skipping malformed JSON-LD block: {}", e);
                facts.malformed_blocks += 1;
            }
        }
    }

    for item in document.select(selector!("[itemscope]")) {
        if let Some(itemtype) = item.value().attr("itemtype") {
            for t in itemtype.split_whitespace() {
                push_unique(&mut facts.microdata_types, t);
            }
        }
    }

    facts.has_rdfa = document.select(selector!("[vocab], [typeof]")).next().is_some();

    facts
}
