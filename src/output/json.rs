use crate::extract::ScrapedFactSet;
use crate::output::OutputResult;
use crate::score::ScoreReport;
use serde::Serialize;

#[derive(Serialize)]
struct JsonReport<'a> {
    facts: &'a ScrapedFactSet,
    report: &'a ScoreReport,
}

/// Formats an analysis as pretty-printed JSON: `{"facts": ..., "report": ...}`
pub fn format_json_report(facts: &ScrapedFactSet, report: &ScoreReport) -> OutputResult<String> {
    Ok(serde_json::to_string_pretty(&JsonReport { facts, report })?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract;
    use crate::score::score;
    use serde_json::Value;
    use url::Url;

    #[test]
    fn test_json_shape() {
        let facts = extract(
            "<title>Hi</title><h1>Hi</h1>",
            &Url::parse("https://example.com/").unwrap(),
            None,
        );
        let report = score(&facts);
        let json: Value = serde_json::from_str(&format_json_report(&facts, &report).unwrap()).unwrap();

        assert_eq!(json["facts"]["url"], "https://example.com/");
        assert_eq!(json["facts"]["title"]["source"], "title");
        assert_eq!(json["facts"]["rendering"]["strategy"], "static");
        assert_eq!(json["report"]["score"], u64::from(report.score));
        assert!(json["report"]["recommendations"].is_array());
    }
}
