//! Seoscope main entry point
//!
//! This is the command-line interface for the Seoscope page analyzer.

use clap::{Parser, ValueEnum};
use seoscope::config::{load_config_with_hash, Config};
use seoscope::output::{format_json_report, format_markdown_report, write_report};
use seoscope::{score, Analyzer};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Seoscope: an adaptive SEO page analyzer
///
/// Seoscope fetches a page, renders it in a headless browser when its
/// framework needs it, extracts on-page, technical and performance facts,
/// checks the health of every link it finds, and prints a scored report.
#[derive(Parser, Debug)]
#[command(name = "seoscope")]
#[command(version)]
#[command(about = "An adaptive SEO page analyzer", long_about = None)]
struct Cli {
    /// Page to analyze; `https://` is assumed when no scheme is given
    #[arg(value_name = "URL", required_unless_present = "show_config")]
    url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Ignore cached profiles, renders and analyses
    #[arg(long)]
    force_refresh: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Markdown)]
    format: ReportFormat,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Never launch a headless browser
    #[arg(long)]
    no_render: bool,

    /// Skip link health checks
    #[arg(long)]
    no_links: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Print the effective configuration and exit
    #[arg(long)]
    show_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Markdown,
    Json,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => Config::default(),
    };

    if cli.no_render {
        config.renderer.enabled = false;
    }
    if cli.no_links {
        config.links.enabled = false;
    }

    if cli.show_config {
        print!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    let Some(url) = cli.url.as_deref() else {
        return Err("a URL is required".into());
    };

    let analyzer = Analyzer::new(config)?;
    let result = handle_analyze(&analyzer, url, &cli).await;
    analyzer.shutdown().await;

    if let Err(e) = &result {
        tracing::error!("Analysis failed: {}", e);
    }
    result
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("seoscope=info,warn"),
            1 => EnvFilter::new("seoscope=debug,info"),
            2 => EnvFilter::new("seoscope=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Logs go to stderr so a report on stdout stays pipeable
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Analyzes one page and emits its report
async fn handle_analyze(
    analyzer: &Analyzer,
    url: &str,
    cli: &Cli,
) -> Result<(), Box<dyn std::error::Error>> {
    let facts = analyzer.analyze(url, cli.force_refresh).await?;
    let report = score(&facts);

    tracing::info!(
        "Score for {}: {}/100 ({} issues)",
        facts.url,
        report.score,
        report.issues.len()
    );

    let content = match cli.format {
        ReportFormat::Markdown => format_markdown_report(&facts, &report),
        ReportFormat::Json => format_json_report(&facts, &report)?,
    };

    match &cli.output {
        Some(path) => write_report(path, &content)?,
        None => println!("{}", content),
    }

    Ok(())
}
