//! SQLite record sink

use crate::output::traits::{OutputError, OutputResult, RecordSink};
use crate::records::Record;
use crate::storage::{SqliteStorage, Storage};
use std::sync::{Arc, Mutex};

/// Writes records into the run's database
///
/// Games are upserted on (title_safe, platform) and duplicate reviews are
/// ignored, so re-delivered pages leave the tables unchanged.
pub struct SqliteSink {
    storage: Arc<Mutex<SqliteStorage>>,
    run_id: i64,
    games: u64,
    reviews: u64,
    duplicates: u64,
}

impl SqliteSink {
    pub fn new(storage: Arc<Mutex<SqliteStorage>>, run_id: i64) -> Self {
        Self {
            storage,
            run_id,
            games: 0,
            reviews: 0,
            duplicates: 0,
        }
    }
}

impl RecordSink for SqliteSink {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn emit(&mut self, record: &Record) -> OutputResult<()> {
        let mut storage = self
            .storage
            .lock()
            .map_err(|_| OutputError::Write("storage lock poisoned".to_string()))?;

        match record {
            Record::Game(game) => {
                storage.upsert_game(self.run_id, game)?;
                self.games += 1;
            }
            Record::Review(review) => {
                if storage.insert_review(self.run_id, review)? {
                    self.reviews += 1;
                } else {
                    self.duplicates += 1;
                }
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        tracing::info!(
            games = self.games,
            reviews = self.reviews,
            duplicate_reviews = self.duplicates,
            "SQLite sink finished"
        );
        Ok(())
    }
}
