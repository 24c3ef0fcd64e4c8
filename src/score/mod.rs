//! Scoring and recommendation engine
//!
//! `score` is a pure function of a fact-set. It starts from 100 and applies
//! a fixed table of additive penalties; every rule that fires contributes an
//! issue and a recommendation. A second table of informational checks adds
//! issues that carry no penalty.

mod rules;

use crate::extract::ScrapedFactSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Score of a page with no findings
pub const MAX_SCORE: u8 = 100;

/// Area of the page an issue belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Title,
    Meta,
    Headings,
    Images,
    Performance,
    Security,
    Mobile,
    Technical,
    StructuredData,
    Links,
    Indexing,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Title => "Title",
            Category::Meta => "Meta",
            Category::Headings => "Headings",
            Category::Images => "Images",
            Category::Performance => "Performance",
            Category::Security => "Security",
            Category::Mobile => "Mobile",
            Category::Technical => "Technical",
            Category::StructuredData => "Structured data",
            Category::Links => "Links",
            Category::Indexing => "Indexing",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub category: Category,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub priority: Priority,
    /// Remediation steps, in the order they should be done
    pub steps: Vec<String>,
}

/// Score, issues and recommendations for one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreReport {
    /// In `[0, 100]`
    pub score: u8,
    pub issues: Vec<Issue>,
    /// Highest priority first
    pub recommendations: Vec<Recommendation>,
}

impl ScoreReport {
    pub fn issues_with(&self, severity: Severity) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |i| i.severity == severity)
    }
}

/// Scores a fact-set
///
/// # Examples
///
/// ```
/// use seoscope::{extract, score};
/// use url::Url;
///
/// let url = Url::parse("http://example.com/").unwrap();
/// let facts = extract("<html><body><p>Hello</p></body></html>", &url, None);
/// let report = score(&facts);
///
/// assert!(report.score < 100);
/// assert!(!report.recommendations.is_empty());
/// ```
pub fn score(facts: &ScrapedFactSet) -> ScoreReport {
    let mut total: u32 = 0;
    let mut issues = Vec::new();
    let mut recommendations = Vec::new();

    for rule in rules::PENALTY_RULES {
        if let Some(finding) = rule(facts) {
            total += u32::from(finding.penalty);
            issues.push(finding.issue);
            recommendations.push(finding.recommendation);
        }
    }

    issues.extend(rules::informational(facts));

    // Stable, so rules of equal priority keep table order
    recommendations.sort_by(|a, b| b.priority.cmp(&a.priority));

    let score = u32::from(MAX_SCORE).saturating_sub(total) as u8;
    tracing::debug!(
        "Scored {}: {} ({} issues, {} penalty points)",
        facts.url,
        score,
        issues.len(),
        total
    );

    ScoreReport {
        score,
        issues,
        recommendations,
    }
}
