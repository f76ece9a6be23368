//! Tadu crawler main entry point
//!
//! Serves the crawler over HTTP, or runs a single crawl from the command line.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tadu_crawler::config::{apply_env_overrides, load_config_with_hash, Config};
use tadu_crawler::crawler::crawl;
use tadu_crawler::output::{print_statistics, CrawlStatistics};
use tracing_subscriber::EnvFilter;

/// Tadu crawler: book listings, metadata and chapters
///
/// Without --page, starts the HTTP service (`GET /crawl?page=&num_chapters=`).
/// With --page, crawls that listing page once and prints the JSON result.
#[derive(Parser, Debug)]
#[command(name = "tadu-crawler")]
#[command(version)]
#[command(about = "Crawls Tadu book listings, metadata and chapters", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Port for the HTTP service (overrides config and PORT)
    #[arg(long, conflicts_with_all = ["page", "dry_run"])]
    port: Option<u16>,

    /// Crawl this listing page once and print the result instead of serving
    #[arg(long)]
    page: Option<u32>,

    /// Chapters to fetch per book in one-shot mode
    #[arg(long, requires = "page")]
    num_chapters: Option<usize>,

    /// Print the effective configuration and exit
    #[arg(long, conflicts_with = "page")]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = load(&cli)?;
    apply_env_overrides(&mut config);
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    let config = Arc::new(config);

    if cli.dry_run {
        handle_dry_run(&config)
    } else if let Some(page) = cli.page {
        let num_chapters = cli
            .num_chapters
            .unwrap_or(config.crawl.default_num_chapters);
        handle_crawl(config, page, num_chapters).await
    } else {
        tadu_crawler::api::serve(config)
            .await
            .context("HTTP service failed")
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("tadu_crawler=info,tower_http=info,warn"),
            1 => EnvFilter::new("tadu_crawler=debug,tower_http=debug,info"),
            2 => EnvFilter::new("tadu_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Stdout carries JSON results in one-shot mode
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load(cli: &Cli) -> anyhow::Result<Config> {
    let Some(path) = &cli.config else {
        tracing::info!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    Ok(config)
}

/// Handles --dry-run: prints the effective configuration as TOML
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let rendered = toml::to_string_pretty(config).context("Failed to render configuration")?;
    println!("{}", rendered);
    eprintln!("✓ Configuration is valid");
    Ok(())
}

/// Handles --page: one crawl, JSON to stdout, statistics to stderr
async fn handle_crawl(config: Arc<Config>, page: u32, num_chapters: usize) -> anyhow::Result<()> {
    tracing::info!(
        "Crawling listing page {} with {} chapters per book",
        page,
        num_chapters
    );

    let start_time = Instant::now();
    let result = crawl(config, page, num_chapters)
        .await
        .with_context(|| format!("Crawl of listing page {} failed", page))?;

    println!("{}", serde_json::to_string_pretty(&result)?);

    let stats = CrawlStatistics::from_result(page, &result, start_time.elapsed());
    print_statistics(&stats);

    Ok(())
}
