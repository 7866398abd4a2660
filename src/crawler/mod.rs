//! Crawler module for fetching and processing catalog pages
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic
//! - Per-kind page dispatch into entries and records
//! - Request scheduling and rate limiting
//! - Overall crawl coordination

mod coordinator;
mod dispatch;
mod fetcher;
mod scheduler;

pub use coordinator::{run_crawl, Coordinator, CrawlReport};
pub use dispatch::{process_document, CrawlMode, PageOutcome};
pub use fetcher::{build_http_client, fetch_url, FetchResult, RetryPolicy};
pub use scheduler::{QueuedEntry, Rejection, ScheduledFetch, Scheduler};
