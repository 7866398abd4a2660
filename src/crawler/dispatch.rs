//! Page dispatch
//!
//! Maps one fetched document to its outcome: the frontier entries it
//! discovers and the records it yields. Dispatch is pure and synchronous so
//! the whole traversal can be exercised by feeding synthetic documents.

use crate::discover::{discover_listing, next_page, resolve_review_links};
use crate::frontier::{EntryKind, FrontierEntry};
use crate::records::{assemble_game, extract_reviews, Record};
use scraper::Html;
use std::fmt;
use url::Url;

/// Which record types a run produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CrawlMode {
    /// Game metadata only
    GameInfo,
    /// Critic and user reviews only
    GameReviews,
    /// Both
    #[default]
    Full,
}

impl CrawlMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GameInfo => "game-info",
            Self::GameReviews => "game-reviews",
            Self::Full => "full",
        }
    }

    pub fn emits_games(&self) -> bool {
        matches!(self, Self::GameInfo | Self::Full)
    }

    pub fn follows_reviews(&self) -> bool {
        matches!(self, Self::GameReviews | Self::Full)
    }
}

impl fmt::Display for CrawlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What one page contributed to the crawl
#[derive(Debug, Default)]
pub struct PageOutcome {
    pub entries: Vec<FrontierEntry>,
    pub records: Vec<Record>,
}

/// Processes a fetched document according to its entry kind
///
/// `page_url` is the final URL after redirects and is the base for link
/// resolution and the game slug.
pub fn process_document(
    entry: &FrontierEntry,
    page_url: &Url,
    html: &str,
    mode: CrawlMode,
) -> PageOutcome {
    let document = Html::parse_document(html);
    let mut outcome = PageOutcome::default();

    match entry.kind() {
        EntryKind::Listing => {
            outcome.entries = discover_listing(&document, entry, page_url);
        }

        EntryKind::Detail => {
            if mode.emits_games() {
                outcome
                    .records
                    .push(assemble_game(&document, page_url).into());
            }
            if mode.follows_reviews() {
                outcome.entries = resolve_review_links(&document, page_url);
            }
        }

        EntryKind::ReviewIndex => {
            let Some(context) = entry.context() else {
                tracing::warn!(url = %page_url, "Review index without review context, skipping");
                return outcome;
            };

            outcome.records = extract_reviews(&document, context)
                .into_iter()
                .map(Record::from)
                .collect();

            if let Some(next) = next_page(&document, page_url) {
                outcome.entries.push(entry.next_page(next));
            }

            if outcome.records.is_empty() && outcome.entries.is_empty() {
                tracing::debug!(
                    url = %page_url,
                    review_type = %context.review_type,
                    game = %context.game_slug,
                    "Review traversal finished"
                );
            }
        }
    }

    outcome
}
