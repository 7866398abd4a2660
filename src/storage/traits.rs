//! Storage traits and error types

use crate::frontier::ReviewType;
use crate::records::{GameRecord, ReviewRecord};
use crate::storage::{FailureRecord, RunRecord, RunStatus};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Record writes are idempotent: storing the same record twice leaves one row.
pub trait Storage {
    // ===== Run Management =====

    /// Creates a new crawl run and returns its ID
    fn create_run(&mut self, config_hash: &str, mode: &str) -> StorageResult<i64>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    /// Sets the final status of a run and stamps its finish time
    fn finish_run(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()>;

    // ===== Records =====

    /// Inserts a game or updates the existing (title_safe, platform) row
    fn upsert_game(&mut self, run_id: i64, game: &GameRecord) -> StorageResult<()>;

    /// Inserts a review; returns false if an identical review was stored already
    fn insert_review(&mut self, run_id: i64, review: &ReviewRecord) -> StorageResult<bool>;

    /// Records a page the fetcher gave up on
    fn record_failure(&mut self, run_id: i64, failure: &FailureRecord) -> StorageResult<()>;

    // ===== Statistics =====

    fn count_games(&self) -> StorageResult<u64>;

    fn count_reviews(&self, review_type: ReviewType) -> StorageResult<u64>;

    fn count_failures(&self, run_id: i64) -> StorageResult<u64>;

    /// Failures of a run grouped by failure kind, most frequent first
    fn failure_summary(&self, run_id: i64) -> StorageResult<Vec<(String, u64)>>;
}
