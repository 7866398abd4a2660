//! Output records and their assembly
//!
//! Records are plain data: every field is a `String` holding either an
//! extracted value or the rule's declared default. Assembly is a pure
//! function of one document.

mod game;
mod review;

pub use game::assemble_game;
pub use review::extract_reviews;

use crate::frontier::ReviewType;
use serde::Serialize;

/// Metadata for one game on one platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameRecord {
    pub title: String,
    pub title_safe: String,
    pub platform: String,
    pub publisher: String,
    pub developer: String,
    pub release_date: String,
    pub score_metacritic: String,
    pub score_users: String,
    pub summary: String,
    pub rating: String,
    pub genres: String,
}

/// One critic or user review of a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewRecord {
    pub title: String,
    pub title_safe: String,
    pub platform: String,
    pub reviewer: String,
    pub reviewer_type: ReviewType,
    pub score: String,
    pub review_date: String,
    pub review: String,
    pub review_url: String,
}

/// A record handed to the output sinks
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "record", rename_all = "lowercase")]
pub enum Record {
    Game(GameRecord),
    Review(ReviewRecord),
}

impl Record {
    pub fn title_safe(&self) -> &str {
        match self {
            Self::Game(game) => &game.title_safe,
            Self::Review(review) => &review.title_safe,
        }
    }
}

impl From<GameRecord> for Record {
    fn from(record: GameRecord) -> Self {
        Self::Game(record)
    }
}

impl From<ReviewRecord> for Record {
    fn from(record: ReviewRecord) -> Self {
        Self::Review(record)
    }
}
