//! Output module for analysis reports
//!
//! This module handles:
//! - Rendering a fact-set and its score report as markdown
//! - Serializing them as JSON
//! - Writing a finished report to disk

mod json;
mod markdown;

pub use json::format_json_report;
pub use markdown::format_markdown_report;

use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while producing a report
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to format output: {0}")]
    Format(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Writes a formatted report, replacing any existing file
///
/// # Arguments
///
/// * `path` - Destination file
/// * `content` - The formatted report
pub fn write_report(path: &Path, content: &str) -> OutputResult<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    if !content.ends_with('\n') {
        file.write_all(b"\n")?;
    }

    tracing::info!("Report written to {}", path.display());
    Ok(())
}
