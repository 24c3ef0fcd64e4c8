//! Markdown report generation
//!
//! Renders a fact-set and its score report as a human-readable audit:
//! score and issues first, then recommendations, then the facts per group.

use crate::extract::ScrapedFactSet;
use crate::score::{ScoreReport, Severity};
use std::fmt::Write;

/// Keywords listed in the report
const MAX_KEYWORDS: usize = 10;

/// Broken links listed in the report
const MAX_BROKEN_LINKS: usize = 20;

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn or_none(value: Option<&str>) -> &str {
    value.unwrap_or("none")
}

/// Formats an analysis as markdown
///
/// # Arguments
///
/// * `facts` - The analyzed page
/// * `report` - The score report for `facts`
///
/// # Returns
///
/// A formatted markdown string
pub fn format_markdown_report(facts: &ScrapedFactSet, report: &ScoreReport) -> String {
    let mut md = String::new();

    // Writing to a String cannot fail
    let _ = write_report(&mut md, facts, report);
    md
}

fn write_report(md: &mut String, facts: &ScrapedFactSet, report: &ScoreReport) -> std::fmt::Result {
    writeln!(md, "# SEO Report: {}\n", facts.url)?;
    writeln!(md, "- **Score**: {}/100", report.score)?;
    writeln!(md, "- **Analyzed**: {}", facts.analyzed_at.to_rfc3339())?;
    writeln!(
        md,
        "- **Rendering**: {} ({}, {} ms)\n",
        facts.rendering.strategy, facts.rendering.framework, facts.rendering.elapsed_ms
    )?;

    if !report.issues.is_empty() {
        writeln!(md, "## Issues\n")?;
        writeln!(
            md,
            "{} critical, {} warnings, {} informational\n",
            report.issues_with(Severity::Critical).count(),
            report.issues_with(Severity::Warning).count(),
            report.issues_with(Severity::Info).count()
        )?;
        writeln!(md, "| Severity | Category | Issue |")?;
        writeln!(md, "|----------|----------|-------|")?;
        for issue in &report.issues {
            writeln!(
                md,
                "| {} | {} | {} |",
                issue.severity,
                issue.category,
                issue.message.replace('|', "\\|")
            )?;
        }
        writeln!(md)?;
    }

    if !report.recommendations.is_empty() {
        writeln!(md, "## Recommendations\n")?;
        for rec in &report.recommendations {
            writeln!(md, "### {} ({} priority)\n", rec.title, rec.priority)?;
            for (i, step) in rec.steps.iter().enumerate() {
                writeln!(md, "{}. {}", i + 1, step)?;
            }
            writeln!(md)?;
        }
    }

    writeln!(md, "## On-Page\n")?;
    writeln!(
        md,
        "- **Title**: {} ({} characters)",
        or_none(facts.title.text.as_deref()),
        facts.title.length
    )?;
    writeln!(
        md,
        "- **Meta description**: {} ({} characters)",
        or_none(facts.meta.description.as_deref()),
        facts.meta.description_length
    )?;
    writeln!(
        md,
        "- **Headings**: {} H1, {} total",
        facts.headings.h1_count(),
        facts.headings.headings.len()
    )?;
    writeln!(
        md,
        "- **Images**: {} total, {} without alt, {} lazy-loaded",
        facts.images.total, facts.images.without_alt, facts.images.lazy_loaded
    )?;
    writeln!(
        md,
        "- **Content**: {} words, {} sentences, readability {:.1}\n",
        facts.content.word_count, facts.content.sentence_count, facts.content.readability
    )?;

    if !facts.keywords.keywords.is_empty() {
        writeln!(md, "### Top Keywords\n")?;
        writeln!(md, "| Phrase | Count | Density |")?;
        writeln!(md, "|--------|-------|---------|")?;
        for keyword in facts.keywords.keywords.iter().take(MAX_KEYWORDS) {
            writeln!(
                md,
                "| {} | {} | {:.2}% |",
                keyword.phrase, keyword.count, keyword.density
            )?;
        }
        writeln!(md)?;
    }

    writeln!(md, "## Technical\n")?;
    writeln!(
        md,
        "- **Canonical**: {}{}",
        or_none(facts.technical.canonical.as_deref()),
        if facts.technical.canonical_is_self {
            " (self)"
        } else {
            ""
        }
    )?;
    writeln!(md, "- **Hreflang alternates**: {}", facts.technical.hreflang.len())?;
    writeln!(md, "- **Favicon**: {}", yes_no(facts.technical.has_favicon))?;
    writeln!(md, "- **Doctype**: {}", yes_no(facts.technical.has_doctype))?;
    writeln!(md, "- **Robots meta**: {}", or_none(facts.meta.robots.as_deref()))?;
    writeln!(md, "- **Mobile friendly**: {}", yes_no(facts.mobile.is_mobile_friendly()))?;
    writeln!(md, "- **HTTPS**: {}", yes_no(facts.security.https))?;
    if let Some(headers) = &facts.security.headers {
        let missing = headers.missing();
        if !missing.is_empty() {
            writeln!(md, "- **Missing security headers**: {}", missing.join(", "))?;
        }
    }
    let types = &facts.structured_data.types;
    writeln!(
        md,
        "- **Structured data**: {}",
        if types.is_empty() {
            yes_no(facts.structured_data.has_structured_data()).to_string()
        } else {
            types.join(", ")
        }
    )?;
    writeln!(
        md,
        "- **Open Graph**: {}, **Twitter card**: {}",
        yes_no(facts.social.has_open_graph()),
        yes_no(facts.social.has_twitter_card())
    )?;
    let integrations = facts.integrations.detected();
    if !integrations.is_empty() {
        writeln!(md, "- **Integrations**: {}", integrations.join(", "))?;
    }
    writeln!(md)?;

    writeln!(md, "## Performance\n")?;
    match facts.performance.response_time_ms {
        Some(ms) => writeln!(md, "- **Response time**: {} ms", ms)?,
        None => writeln!(md, "- **Response time**: unknown")?,
    }
    writeln!(md, "- **HTML size**: {} bytes", facts.performance.html_bytes)?;
    writeln!(
        md,
        "- **Scripts**: {} ({} external), **Stylesheets**: {}",
        facts.performance.script_count,
        facts.performance.external_script_count,
        facts.performance.stylesheet_count
    )?;
    writeln!(
        md,
        "- **Compression**: {}\n",
        or_none(facts.performance.compression.as_deref())
    )?;

    writeln!(md, "## Links\n")?;
    writeln!(
        md,
        "- **Internal**: {}, **External**: {}, **Nofollow**: {}",
        facts.links.internal_count, facts.links.external_count, facts.links.nofollow_count
    )?;
    if let Some(health) = &facts.link_health {
        writeln!(
            md,
            "- **Checked**: {} ({} ok, {} redirects, {} broken, {} unknown)",
            health.checked,
            health.ok,
            health.redirects,
            health.broken_count(),
            health.unknown
        )?;
        if !health.broken.is_empty() {
            writeln!(md, "\n| Status | URL |")?;
            writeln!(md, "|--------|-----|")?;
            for link in health.broken.iter().take(MAX_BROKEN_LINKS) {
                writeln!(md, "| {} | {} |", link.status, link.url)?;
            }
            if health.broken.len() > MAX_BROKEN_LINKS {
                writeln!(md, "\n... and {} more", health.broken.len() - MAX_BROKEN_LINKS)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::LinkHealthSummary;
    use crate::extract::extract;
    use crate::score::score;
    use std::collections::HashMap;
    use url::Url;

    fn analysis(html: &str) -> (ScrapedFactSet, ScoreReport) {
        let facts = extract(html, &Url::parse("http://example.com/").unwrap(), None);
        let report = score(&facts);
        (facts, report)
    }

    #[test]
    fn test_report_sections() {
        let (facts, report) = analysis("<title>Hello</title><p>seo tools seo tools</p>");
        let md = format_markdown_report(&facts, &report);

        assert!(md.starts_with("# SEO Report: http://example.com/"));
        assert!(md.contains(&format!("**Score**: {}/100", report.score)));
        assert!(md.contains("## Issues"));
        let critical = report
            .issues
            .iter()
            .filter(|i| i.severity == Severity::Critical)
            .count();
        assert!(critical >= 1);
        assert!(md.contains(&format!("{} critical, ", critical)));
        assert!(md.contains("| critical | Headings | No H1 tag found |"));
        assert!(md.contains("## Recommendations"));
        assert!(md.contains("- **Title**: Hello (5 characters)"));
        assert!(md.contains("| seo | 2 |"));
        assert!(md.contains("- **Response time**: unknown"));
    }

    #[test]
    fn test_broken_links_listed() {
        let (facts, report) = analysis("<p>x</p>");
        let results = HashMap::from([
            ("https://example.com/gone".to_string(), Some(404)),
            ("https://example.com/ok".to_string(), Some(200)),
        ]);
        let facts = facts.with_link_health(LinkHealthSummary::from_results(&results));
        let md = format_markdown_report(&facts, &report);

        assert!(md.contains("- **Checked**: 2 (1 ok, 0 redirects, 1 broken, 0 unknown)"));
        assert!(md.contains("| 404 | https://example.com/gone |"));
    }
}
