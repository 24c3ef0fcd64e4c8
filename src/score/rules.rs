use crate::extract::ScrapedFactSet;
use crate::score::{Category, Issue, Priority, Recommendation, Severity};

/// A penalty rule that fired
pub(crate) struct Finding {
    pub penalty: u8,
    pub issue: Issue,
    pub recommendation: Recommendation,
}

type Rule = fn(&ScrapedFactSet) -> Option<Finding>;

/// Every penalty rule, in report order
pub(crate) const PENALTY_RULES: &[Rule] = &[
    title_length,
    meta_description,
    h1_presence,
    image_alt_coverage,
    load_time,
    https,
    viewport,
    canonical,
    favicon,
    structured_data,
];

fn finding(
    penalty: u8,
    category: Category,
    severity: Severity,
    message: String,
    title: &str,
    priority: Priority,
    steps: &[&str],
) -> Option<Finding> {
    Some(Finding {
        penalty,
        issue: Issue {
            category,
            severity,
            message,
        },
        recommendation: Recommendation {
            title: title.to_string(),
            priority,
            steps: steps.iter().map(|s| s.to_string()).collect(),
        },
    })
}

fn title_length(facts: &ScrapedFactSet) -> Option<Finding> {
    if facts.title.has_good_length() {
        return None;
    }
    let message = match facts.title.text {
        None => "Page has no title".to_string(),
        Some(_) => format!(
            "Title is {} characters; 30 to 60 is recommended",
            facts.title.length
        ),
    };
    finding(
        10,
        Category::Title,
        Severity::Critical,
        message,
        "Write a descriptive title of 30 to 60 characters",
        Priority::High,
        &[
            "Add a single <title> element inside <head>",
            "Lead with the primary keyword and keep it unique across the site",
            "Keep it between 30 and 60 characters so it is not truncated in results",
        ],
    )
}

fn meta_description(facts: &ScrapedFactSet) -> Option<Finding> {
    let message = if facts.meta.description.is_none() {
        "Meta description is missing".to_string()
    } else if facts.meta.has_duplicate_description() {
        format!(
            "Page has {} meta description tags",
            facts.meta.description_count
        )
    } else {
        return None;
    };
    finding(
        10,
        Category::Meta,
        Severity::Warning,
        message,
        "Provide exactly one meta description",
        Priority::High,
        &[
            "Add <meta name=\"description\"> to <head> and remove any duplicates",
            "Summarize the page in 120 to 160 characters",
        ],
    )
}

fn h1_presence(facts: &ScrapedFactSet) -> Option<Finding> {
    match facts.headings.h1_count() {
        0 => finding(
            15,
            Category::Headings,
            Severity::Critical,
            "No H1 tag found".to_string(),
            "Add a single H1 heading",
            Priority::High,
            &[
                "Add one <h1> that states the topic of the page",
                "Use h2 to h6 for the sections below it",
            ],
        ),
        1 => None,
        n => finding(
            8,
            Category::Headings,
            Severity::Warning,
            format!("Multiple H1 tags found ({})", n),
            "Keep only one H1 heading",
            Priority::Medium,
            &["Demote secondary <h1> elements to <h2> or lower"],
        ),
    }
}

fn image_alt_coverage(facts: &ScrapedFactSet) -> Option<Finding> {
    let coverage = facts.images.alt_coverage()?;
    let (penalty, severity, priority) = if coverage < 0.5 {
        (10, Severity::Warning, Priority::High)
    } else if coverage < 0.8 {
        (5, Severity::Warning, Priority::Medium)
    } else {
        return None;
    };
    finding(
        penalty,
        Category::Images,
        severity,
        format!(
            "{} of {} images lack alt text ({:.0}% coverage)",
            facts.images.without_alt,
            facts.images.total,
            coverage * 100.0
        ),
        "Describe images with alt text",
        priority,
        &[
            "Add an alt attribute describing each meaningful image",
            "Use alt=\"\" only for purely decorative images",
        ],
    )
}

fn load_time(facts: &ScrapedFactSet) -> Option<Finding> {
    let ms = facts.performance.response_time_ms?;
    let (penalty, severity, priority) = if ms > 3000 {
        (20, Severity::Critical, Priority::High)
    } else if ms > 2000 {
        (10, Severity::Warning, Priority::Medium)
    } else {
        return None;
    };
    finding(
        penalty,
        Category::Performance,
        severity,
        format!("Page responded in {} ms", ms),
        "Reduce server response time",
        priority,
        &[
            "Enable HTTP caching and response compression",
            "Serve static assets from a CDN",
            "Profile slow server-side work and cache its results",
        ],
    )
}

fn https(facts: &ScrapedFactSet) -> Option<Finding> {
    if facts.security.https {
        return None;
    }
    finding(
        10,
        Category::Security,
        Severity::Critical,
        "Page is not served over HTTPS".to_string(),
        "Serve the site over HTTPS",
        Priority::High,
        &[
            "Install a TLS certificate",
            "Redirect every http:// URL to its https:// counterpart with a 301",
        ],
    )
}

fn viewport(facts: &ScrapedFactSet) -> Option<Finding> {
    if facts.mobile.has_viewport {
        return None;
    }
    finding(
        10,
        Category::Mobile,
        Severity::Warning,
        "Viewport meta tag is missing".to_string(),
        "Add a responsive viewport",
        Priority::High,
        &["Add <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">"],
    )
}

fn canonical(facts: &ScrapedFactSet) -> Option<Finding> {
    if facts.technical.has_canonical {
        return None;
    }
    finding(
        5,
        Category::Technical,
        Severity::Warning,
        "Canonical link is missing".to_string(),
        "Declare a canonical URL",
        Priority::Medium,
        &["Add <link rel=\"canonical\" href=\"...\"> pointing at the preferred URL"],
    )
}

fn favicon(facts: &ScrapedFactSet) -> Option<Finding> {
    if facts.technical.has_favicon {
        return None;
    }
    finding(
        5,
        Category::Technical,
        Severity::Info,
        "Favicon is missing".to_string(),
        "Add a favicon",
        Priority::Low,
        &["Add <link rel=\"icon\" href=\"/favicon.ico\">"],
    )
}

fn structured_data(facts: &ScrapedFactSet) -> Option<Finding> {
    if facts.structured_data.has_structured_data() {
        return None;
    }
    finding(
        5,
        Category::StructuredData,
        Severity::Info,
        "No structured data found".to_string(),
        "Add schema.org structured data",
        Priority::Medium,
        &[
            "Describe the page with a JSON-LD block using the closest schema.org type",
            "Validate it with a rich results testing tool",
        ],
    )
}

/// Issues that are reported but never change the score
pub(crate) fn informational(facts: &ScrapedFactSet) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut push = |category, severity, message: String| {
        issues.push(Issue {
            category,
            severity,
            message,
        })
    };

    if let Some(health) = &facts.link_health {
        for link in &health.broken {
            push(
                Category::Links,
                Severity::Warning,
                format!("Broken link ({}): {}", link.status, link.url),
            );
        }
    }

    if facts.security.has_mixed_content() {
        push(
            Category::Security,
            Severity::Warning,
            format!(
                "{} insecure resources loaded on an HTTPS page",
                facts.security.mixed_content.len()
            ),
        );
    }

    if facts.meta.noindex {
        push(
            Category::Indexing,
            Severity::Warning,
            "Page asks search engines not to index it (noindex)".to_string(),
        );
    }

    for issue in &facts.images.issues {
        push(Category::Images, Severity::Info, issue.clone());
    }

    // H1 count is already a penalty rule
    for issue in facts
        .headings
        .issues
        .iter()
        .filter(|i| i.starts_with("Heading level skipped"))
    {
        push(Category::Headings, Severity::Info, issue.clone());
    }

    issues
}
