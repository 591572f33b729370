//! Semi-Scrape main entry point
//!
//! This is the command-line interface for the Semi-Scrape page metadata harvester.

use anyhow::Context;
use clap::Parser;
use semi_scrape::config::{load_config_with_hash, Config};
use semi_scrape::crawler::Coordinator;
use semi_scrape::input::read_url_list;
use semi_scrape::output::{print_statistics, CsvReport};
use semi_scrape::url::{extract_domain, parse_target, position_of_policy};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Semi-Scrape: a rate-limited page metadata harvester
///
/// Semi-Scrape fetches every URL in a list under per-domain rate limits,
/// extracts each page's first H1, meta description and title, and writes
/// one CSV row per URL.
#[derive(Parser, Debug)]
#[command(name = "semi-scrape")]
#[command(version = "1.0.0")]
#[command(about = "A rate-limited page metadata harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults if omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// URL list to crawl, one URL per line
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// CSV report destination
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using built-in defaults");
            Config::default()
        }
    };

    if let Some(input) = &cli.input {
        config.paths.url_list = input.display().to_string();
    }
    if let Some(output) = &cli.output {
        config.paths.output_csv = output.display().to_string();
    }

    let url_list = PathBuf::from(&config.paths.url_list);
    let urls = read_url_list(&url_list).context("Cannot start without a URL list")?;
    tracing::info!("Read {} URLs from {}", urls.len(), url_list.display());

    if cli.dry_run {
        handle_dry_run(&config, &urls);
        return Ok(());
    }

    handle_crawl(config, &urls).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("semi_scrape=info,warn"),
            1 => EnvFilter::new("semi_scrape=debug,info"),
            2 => EnvFilter::new("semi_scrape=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration and policy coverage
fn handle_dry_run(config: &Config, urls: &[String]) {
    println!("=== Semi-Scrape Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Connect timeout: {}s", config.crawler.connect_timeout_secs);
    println!("  Max attempts: {}", config.crawler.max_attempts);
    println!(
        "  Retry backoff: {}ms (max {}ms)",
        config.crawler.retry_backoff_ms, config.crawler.max_backoff_ms
    );
    println!("  Max redirects: {}", config.crawler.max_redirects);
    println!(
        "  Accept invalid certificates: {}",
        config.crawler.accept_invalid_certs
    );

    println!("\nHeaders:");
    println!("  User-Agent: {}", config.headers.user_agent);
    println!("  Accept-Language: {}", config.headers.accept_language);

    println!("\nPaths:");
    println!("  URL list: {}", config.paths.url_list);
    println!("  Report: {}", config.paths.output_csv);

    let mut covered = vec![0usize; config.domains.len()];
    let mut unlimited = 0usize;
    let mut invalid = 0usize;
    for raw in urls {
        let Ok(url) = parse_target(raw) else {
            invalid += 1;
            continue;
        };
        let domain = extract_domain(&url).unwrap_or_default();
        match position_of_policy(&domain, &config.domains) {
            Some(index) => covered[index] += 1,
            None => unlimited += 1,
        }
    }

    println!("\nDomain Policies ({}):", config.domains.len());
    for (policy, count) in config.domains.iter().zip(&covered) {
        println!(
            "  - {} (parallelism {}, delay {}ms, jitter {}ms): {} URLs",
            policy.pattern, policy.parallelism, policy.delay_ms, policy.jitter_ms, count
        );
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would fetch {} URLs ({} unthrottled, {} invalid)",
        urls.len(),
        unlimited,
        invalid
    );
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, urls: &[String]) -> anyhow::Result<()> {
    let output = PathBuf::from(&config.paths.output_csv);
    let report = CsvReport::create(&output).context("Cannot open report destination")?;

    let coordinator = Coordinator::new(config).context("Failed to set up the crawler")?;
    let result = coordinator.run(urls).await;

    report
        .write(&result.rows)
        .context("Failed to write the report")?;
    tracing::info!("Wrote {} rows to {}", result.rows.len(), output.display());

    print_statistics(&result.stats);
    tracing::info!("Done.");

    Ok(())
}
