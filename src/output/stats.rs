//! Statistics generation from the crawl database
//!
//! This module provides functionality for extracting and displaying
//! record and failure counts from the storage layer.

use crate::frontier::ReviewType;
use crate::storage::{RunRecord, Storage, StorageResult};

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// Most recent run, if any
    pub latest_run: Option<RunRecord>,

    /// Distinct (title_safe, platform) games stored
    pub games: u64,

    pub critic_reviews: u64,

    pub user_reviews: u64,

    /// Fetch failures of the latest run
    pub failures: u64,

    /// Failures of the latest run by kind, most frequent first
    pub failure_summary: Vec<(String, u64)>,
}

impl CrawlStatistics {
    pub fn total_reviews(&self) -> u64 {
        self.critic_reviews + self.user_reviews
    }
}

/// Loads statistics from storage
pub fn load_statistics(storage: &dyn Storage) -> StorageResult<CrawlStatistics> {
    let latest_run = storage.get_latest_run()?;

    let (failures, failure_summary) = match &latest_run {
        Some(run) => (storage.count_failures(run.id)?, storage.failure_summary(run.id)?),
        None => (0, Vec::new()),
    };

    Ok(CrawlStatistics {
        latest_run,
        games: storage.count_games()?,
        critic_reviews: storage.count_reviews(ReviewType::Critic)?,
        user_reviews: storage.count_reviews(ReviewType::User)?,
        failures,
        failure_summary,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    match &stats.latest_run {
        Some(run) => {
            println!("Latest run: #{} ({}, {})", run.id, run.mode, run.status.to_db_string());
            println!("  Started:  {}", run.started_at);
            if let Some(finished) = &run.finished_at {
                println!("  Finished: {}", finished);
            }
        }
        None => println!("No crawl runs recorded"),
    }
    println!();

    println!("Records:");
    println!("  Games: {}", stats.games);
    println!(
        "  Reviews: {} ({} critic, {} user)",
        stats.total_reviews(),
        stats.critic_reviews,
        stats.user_reviews
    );
    println!();

    if stats.failures > 0 {
        println!("Fetch Failures ({}):", stats.failures);
        for (kind, count) in &stats.failure_summary {
            println!("  {}: {}", kind, count);
        }
        println!();
    }
}
