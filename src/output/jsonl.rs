//! JSON-lines record sink

use crate::output::traits::{OutputResult, RecordSink};
use crate::records::Record;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const GAMES_FILE: &str = "games.jsonl";
pub const REVIEWS_FILE: &str = "reviews.jsonl";

/// Appends games to `games.jsonl` and reviews to `reviews.jsonl`
///
/// Each line is one JSON object with the record's field names.
pub struct JsonLinesSink {
    dir: PathBuf,
    games: BufWriter<File>,
    reviews: BufWriter<File>,
}

impl JsonLinesSink {
    /// Opens (creating if needed) both files under `dir` in append mode
    pub fn open(dir: &Path) -> OutputResult<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            games: open_append(&dir.join(GAMES_FILE))?,
            reviews: open_append(&dir.join(REVIEWS_FILE))?,
        })
    }
}

fn open_append(path: &Path) -> OutputResult<BufWriter<File>> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(BufWriter::new(file))
}

impl RecordSink for JsonLinesSink {
    fn name(&self) -> &'static str {
        "jsonl"
    }

    fn emit(&mut self, record: &Record) -> OutputResult<()> {
        let (writer, line) = match record {
            Record::Game(game) => (&mut self.games, serde_json::to_string(game)?),
            Record::Review(review) => (&mut self.reviews, serde_json::to_string(review)?),
        };
        writeln!(writer, "{}", line)?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.games.flush()?;
        self.reviews.flush()?;
        tracing::info!(dir = %self.dir.display(), "JSON-lines output flushed");
        Ok(())
    }
}
