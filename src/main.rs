//! Hive-Crawl main entry point
//!
//! This is the command-line interface for the Hive-Crawl prefix-scoped crawler.

use anyhow::Context;
use clap::Parser;
use hive_crawl::config::{
    canonicalize_seeds, load_config_with_hash, validate, Config, CrawlMode,
};
use hive_crawl::crawler::{crawl, CrawlContext};
use hive_crawl::url::Scope;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Hive-Crawl: a prefix-scoped web crawler
///
/// Each seed URL is crawled within its own URL prefix. Results for every seed are
/// written to a timestamped directory holding map.txt, content.txt and log.txt, and an
/// HTML summary of the run is printed to stdout.
#[derive(Parser, Debug)]
#[command(name = "hive-crawl")]
#[command(version)]
#[command(about = "A prefix-scoped web crawler", long_about = None)]
struct Cli {
    /// Seed URLs, appended after any seeds from the config file
    #[arg(value_name = "SEEDS")]
    seeds: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// File with one seed URL per line (blank lines and # comments are skipped)
    #[arg(long, value_name = "FILE")]
    seeds_file: Option<PathBuf>,

    /// Crawl every seed inline instead of through the worker hierarchy
    #[arg(long)]
    serial: bool,

    /// Number of domain supervisors
    #[arg(short = 'n', long, value_name = "N")]
    supervisors: Option<usize>,

    /// Number of page fetchers per supervisor
    #[arg(short = 'm', long, value_name = "M")]
    fetchers: Option<usize>,

    /// Expected total worker count; must equal 1 + N + N*M
    #[arg(long, value_name = "W")]
    workers: Option<usize>,

    /// Directory that receives per-seed result directories
    #[arg(long, value_name = "DIR")]
    results_dir: Option<String>,

    /// Also write the HTML summary to this file
    #[arg(long, value_name = "PATH")]
    summary: Option<String>,

    /// Validate configuration and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("hive_crawl=info,warn"),
            1 => EnvFilter::new("hive_crawl=debug,info"),
            2 => EnvFilter::new("hive_crawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Logs go to stderr so stdout carries only the HTML summary
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (or defaults), applies command-line overrides and validates
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(path) = &cli.seeds_file {
        config.seeds.extend(read_seeds_file(path)?);
    }
    config.seeds.extend(cli.seeds.iter().cloned());

    if cli.serial {
        config.crawler.mode = CrawlMode::Serial;
    }
    if let Some(n) = cli.supervisors {
        config.pool.supervisors = n;
    }
    if let Some(m) = cli.fetchers {
        config.pool.fetchers_per_supervisor = m;
    }
    if cli.workers.is_some() {
        config.pool.workers = cli.workers;
    }
    if let Some(dir) = &cli.results_dir {
        config.output.results_dir = dir.clone();
    }
    if cli.summary.is_some() {
        config.output.summary_path = cli.summary.clone();
    }

    validate(&config).context("invalid configuration")?;
    canonicalize_seeds(&mut config).context("invalid configuration")?;
    Ok(config)
}

fn read_seeds_file(path: &Path) -> anyhow::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read seeds file {}", path.display()))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect())
}

/// Handles the --dry-run mode: shows the topology and the seeds that would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Hive-Crawl Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Mode: {:?}", config.crawler.mode);
    println!("  Max processed pages: {}", config.crawler.max_processed_pages);
    println!("  Max found URLs per page: {}", config.crawler.max_found_urls);
    println!("  Max reported pages: {}", config.crawler.max_reported_pages);

    if config.crawler.mode == CrawlMode::Distributed {
        println!("\nWorker Topology:");
        println!("  Supervisors: {}", config.pool.supervisors);
        println!(
            "  Fetchers per supervisor: {}",
            config.pool.fetchers_per_supervisor
        );
        if let Some(total) = config.pool.required_workers() {
            println!("  Total workers: {}", total);
        }
    }

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Results directory: {}", config.output.results_dir);
    if let Some(path) = &config.output.summary_path {
        println!("  Summary: {}", path);
    }

    println!("\nSeeds ({}):", config.seeds.len());
    for seed in &config.seeds {
        println!("  - {} (scope {})", seed, Scope::for_seed(seed));
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Starting {:?} crawl of {} seeds",
        config.crawler.mode,
        config.seeds.len()
    );

    let ctx = CrawlContext::from_config(&config).context("failed to build HTTP client")?;

    let report = match crawl(&config, ctx).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    if let Some(path) = &config.output.summary_path {
        report
            .write_html(Path::new(path))
            .with_context(|| format!("failed to write summary to {}", path))?;
        tracing::info!("Summary written to {}", path);
    }

    println!("{}", report.to_html());
    Ok(())
}
