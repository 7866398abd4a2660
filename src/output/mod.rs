//! Output module for emitted records and crawl statistics
//!
//! This module handles:
//! - The `RecordSink` trait and its SQLite, JSON-lines and in-memory sinks
//! - Reading back crawl statistics

mod jsonl;
mod sqlite_output;
pub mod stats;
mod traits;

pub use jsonl::{JsonLinesSink, GAMES_FILE, REVIEWS_FILE};
pub use sqlite_output::SqliteSink;
pub use stats::{load_statistics, print_statistics, CrawlStatistics};
pub use traits::{MemorySink, OutputError, OutputResult, RecordSink};
