//! Database schema definitions
//!
//! Games are keyed by (title_safe, platform); re-crawling a detail page
//! updates the row in place. Reviews are keyed by their identity columns so
//! re-delivery of a review page never duplicates rows.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Track crawl runs
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    config_hash TEXT NOT NULL,
    mode TEXT NOT NULL,
    status TEXT NOT NULL
);

-- One row per game and platform
CREATE TABLE IF NOT EXISTS games (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    title_safe TEXT NOT NULL,
    platform TEXT NOT NULL,
    publisher TEXT NOT NULL,
    developer TEXT NOT NULL,
    release_date TEXT NOT NULL,
    score_metacritic TEXT NOT NULL,
    score_users TEXT NOT NULL,
    summary TEXT NOT NULL,
    rating TEXT NOT NULL,
    genres TEXT NOT NULL,
    run_id INTEGER NOT NULL REFERENCES runs(id),
    updated_at TEXT NOT NULL,
    UNIQUE(title_safe, platform)
);

CREATE INDEX IF NOT EXISTS idx_games_title_safe ON games(title_safe);

-- Critic and user reviews
CREATE TABLE IF NOT EXISTS reviews (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    title_safe TEXT NOT NULL,
    platform TEXT NOT NULL,
    reviewer TEXT NOT NULL,
    reviewer_type TEXT NOT NULL,
    score TEXT NOT NULL,
    review_date TEXT NOT NULL,
    review TEXT NOT NULL,
    review_url TEXT NOT NULL,
    run_id INTEGER NOT NULL REFERENCES runs(id),
    UNIQUE(title_safe, platform, reviewer_type, reviewer, review_date, review)
);

CREATE INDEX IF NOT EXISTS idx_reviews_game ON reviews(title_safe, platform);

-- Pages that could not be fetched
CREATE TABLE IF NOT EXISTS fetch_failures (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id INTEGER NOT NULL REFERENCES runs(id),
    url TEXT NOT NULL,
    entry_kind TEXT NOT NULL,
    failure_kind TEXT NOT NULL,
    status_code INTEGER,
    error_message TEXT,
    failed_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_fetch_failures_run ON fetch_failures(run_id);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
