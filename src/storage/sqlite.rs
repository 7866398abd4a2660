//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::frontier::ReviewType;
use crate::records::{GameRecord, ReviewRecord};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{FailureRecord, RunRecord, RunStatus};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens or creates the database at `path` and ensures the schema exists
    pub fn new(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Loads every stored game, ordered by slug and platform
    pub fn load_games(&self) -> StorageResult<Vec<GameRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT title, title_safe, platform, publisher, developer, release_date,
                    score_metacritic, score_users, summary, rating, genres
             FROM games ORDER BY title_safe, platform",
        )?;

        let games = stmt
            .query_map([], |row| {
                Ok(GameRecord {
                    title: row.get(0)?,
                    title_safe: row.get(1)?,
                    platform: row.get(2)?,
                    publisher: row.get(3)?,
                    developer: row.get(4)?,
                    release_date: row.get(5)?,
                    score_metacritic: row.get(6)?,
                    score_users: row.get(7)?,
                    summary: row.get(8)?,
                    rating: row.get(9)?,
                    genres: row.get(10)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(games)
    }

    /// Loads the stored reviews of one game, in insertion order
    pub fn load_reviews(&self, title_safe: &str) -> StorageResult<Vec<ReviewRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT title, title_safe, platform, reviewer, reviewer_type, score,
                    review_date, review, review_url
             FROM reviews WHERE title_safe = ?1 ORDER BY id",
        )?;

        let reviews = stmt
            .query_map(params![title_safe], |row| {
                let reviewer_type: String = row.get(4)?;
                Ok(ReviewRecord {
                    title: row.get(0)?,
                    title_safe: row.get(1)?,
                    platform: row.get(2)?,
                    reviewer: row.get(3)?,
                    reviewer_type: ReviewType::from_db_string(&reviewer_type)
                        .unwrap_or(ReviewType::User),
                    score: row.get(5)?,
                    review_date: row.get(6)?,
                    review: row.get(7)?,
                    review_url: row.get(8)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(reviews)
    }

    fn count(&self, sql: &str, params: impl rusqlite::Params) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(sql, params, |row| row.get(0))?;
        Ok(count as u64)
    }
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        config_hash: row.get(3)?,
        mode: row.get(4)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(5)?).unwrap_or(RunStatus::Running),
    })
}

impl Storage for SqliteStorage {
    // ===== Run Management =====

    fn create_run(&mut self, config_hash: &str, mode: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, mode, status) VALUES (?1, ?2, ?3, ?4)",
            params![now, config_hash, mode, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        self.conn
            .query_row(
                "SELECT id, started_at, finished_at, config_hash, mode, status FROM runs WHERE id = ?1",
                params![run_id],
                run_from_row,
            )
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let run = self
            .conn
            .query_row(
                "SELECT id, started_at, finished_at, config_hash, mode, status FROM runs ORDER BY id DESC LIMIT 1",
                [],
                run_from_row,
            )
            .optional()?;
        Ok(run)
    }

    fn finish_run(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2 WHERE id = ?3",
            params![status.to_db_string(), now, run_id],
        )?;
        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    // ===== Records =====

    fn upsert_game(&mut self, run_id: i64, game: &GameRecord) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO games (title, title_safe, platform, publisher, developer, release_date,
                                score_metacritic, score_users, summary, rating, genres, run_id, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
             ON CONFLICT(title_safe, platform) DO UPDATE SET
                title = excluded.title,
                publisher = excluded.publisher,
                developer = excluded.developer,
                release_date = excluded.release_date,
                score_metacritic = excluded.score_metacritic,
                score_users = excluded.score_users,
                summary = excluded.summary,
                rating = excluded.rating,
                genres = excluded.genres,
                run_id = excluded.run_id,
                updated_at = excluded.updated_at",
            params![
                game.title,
                game.title_safe,
                game.platform,
                game.publisher,
                game.developer,
                game.release_date,
                game.score_metacritic,
                game.score_users,
                game.summary,
                game.rating,
                game.genres,
                run_id,
                now
            ],
        )?;
        Ok(())
    }

    fn insert_review(&mut self, run_id: i64, review: &ReviewRecord) -> StorageResult<bool> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO reviews (title, title_safe, platform, reviewer, reviewer_type,
                                            score, review_date, review, review_url, run_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                review.title,
                review.title_safe,
                review.platform,
                review.reviewer,
                review.reviewer_type.as_str(),
                review.score,
                review.review_date,
                review.review,
                review.review_url,
                run_id
            ],
        )?;
        Ok(inserted > 0)
    }

    fn record_failure(&mut self, run_id: i64, failure: &FailureRecord) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO fetch_failures (run_id, url, entry_kind, failure_kind, status_code, error_message, failed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                run_id,
                failure.url,
                failure.entry_kind,
                failure.failure_kind,
                failure.status_code,
                failure.error_message,
                now
            ],
        )?;
        Ok(())
    }

    // ===== Statistics =====

    fn count_games(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM games", [])
    }

    fn count_reviews(&self, review_type: ReviewType) -> StorageResult<u64> {
        self.count(
            "SELECT COUNT(*) FROM reviews WHERE reviewer_type = ?1",
            params![review_type.as_str()],
        )
    }

    fn count_failures(&self, run_id: i64) -> StorageResult<u64> {
        self.count(
            "SELECT COUNT(*) FROM fetch_failures WHERE run_id = ?1",
            params![run_id],
        )
    }

    fn failure_summary(&self, run_id: i64) -> StorageResult<Vec<(String, u64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT failure_kind, COUNT(*) FROM fetch_failures WHERE run_id = ?1
             GROUP BY failure_kind ORDER BY COUNT(*) DESC, failure_kind",
        )?;

        let summary = stmt
            .query_map(params![run_id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(summary)
    }
}
