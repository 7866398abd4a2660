//! Game Crawler main entry point
//!
//! This is the command-line interface for the game catalog crawler.

use anyhow::Context;
use clap::Parser;
use game_crawler::config::{load_config_with_hash, Config};
use game_crawler::crawler::Coordinator;
use game_crawler::frontier::seed_urls;
use game_crawler::output::{load_statistics, print_statistics};
use game_crawler::storage::SqliteStorage;
use game_crawler::CrawlMode;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Game Crawler: a polite catalog crawler for game metadata and reviews
///
/// Walks the alphabetical listings of each configured platform, extracts
/// one game record per detail page and follows critic and user review
/// pages depending on the mode.
#[derive(Parser, Debug)]
#[command(name = "game-crawler")]
#[command(version)]
#[command(about = "A polite game catalog crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Which records to produce
    #[arg(short, long, value_enum, default_value_t = CrawlMode::Full)]
    mode: CrawlMode,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show the seed frontier without crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    setup_logging(cli.verbose, cli.quiet, config.output.error_log.as_deref())?;
    tracing::info!("Configuration loaded (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config, cli.mode);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(config, &config_hash, cli.mode).await?;
    }

    Ok(())
}

/// Sets up the tracing subscriber
///
/// Console output follows the verbosity flags. When an error log is
/// configured, warnings and errors are also appended to that file.
fn setup_logging(verbose: u8, quiet: bool, error_log: Option<&str>) -> anyhow::Result<()> {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("game_crawler=info,warn"),
            1 => EnvFilter::new("game_crawler=debug,info"),
            2 => EnvFilter::new("game_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let console = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_filter(filter);

    let error_file = match error_log {
        Some(path) => {
            let path = Path::new(path);
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open error log {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .with_filter(LevelFilter::WARN),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console)
        .with(error_file)
        .init();

    Ok(())
}

/// Handles the --dry-run mode: shows configuration and the seed frontier
fn handle_dry_run(config: &Config, mode: CrawlMode) {
    println!("=== Game Crawler Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Mode: {}", mode);
    println!(
        "  Max concurrent pages: {}",
        config.crawler.max_concurrent_pages_open
    );
    println!(
        "  Minimum time on page: {}ms",
        config.crawler.minimum_time_on_page
    );
    println!(
        "  Retries: {} (delay {}ms)",
        config.crawler.max_retries, config.crawler.retry_delay
    );
    println!("  Request timeout: {}s", config.crawler.request_timeout);
    println!("  Respect robots.txt: {}", config.crawler.respect_robots);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nCatalog:");
    println!("  Base URL: {}", config.catalog.base_url);
    println!("  Platforms: {}", config.catalog.platforms.join(", "));
    println!(
        "  Allowed domains: {}",
        config.catalog.allowed_domains.join(", ")
    );

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    if let Some(dir) = &config.output.jsonl_dir {
        println!("  JSON lines: {}", dir);
    }
    if let Some(path) = &config.output.error_log {
        println!("  Error log: {}", path);
    }

    let seeds = seed_urls(&config.catalog.base_url, &config.catalog.platforms);
    println!("\nSeed frontier ({} URLs):", seeds.len());
    for seed in seeds.iter().take(5) {
        println!("  * {}", seed);
    }
    if seeds.len() > 5 {
        println!("  ... and {} more", seeds.len() - 5);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.output.database_path);

    let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, config_hash: &str, mode: CrawlMode) -> anyhow::Result<()> {
    tracing::info!(
        "Platforms: {}, mode: {}",
        config.catalog.platforms.join(", "),
        mode
    );

    let mut coordinator = Coordinator::new(config, config_hash, mode)?;
    coordinator.seed()?;

    let token = coordinator.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after in-flight pages");
            token.cancel();
        }
    });

    let report = coordinator.run().await?;

    if report.cancelled {
        tracing::warn!(
            "Crawl interrupted: {} pages, {} games, {} reviews",
            report.pages_fetched,
            report.games,
            report.reviews
        );
    } else {
        tracing::info!(
            "Crawl completed: {} pages, {} failed, {} games, {} reviews",
            report.pages_fetched,
            report.pages_failed,
            report.games,
            report.reviews
        );
    }

    Ok(())
}
