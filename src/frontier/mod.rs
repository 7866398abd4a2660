//! Frontier types and seed generation
//!
//! A frontier entry is a typed fetch target: a URL, the kind of page it is
//! expected to be, and, for review-index pages, the review context it
//! inherits from the detail page it was discovered on.

mod entry;
mod seeds;

pub use entry::{EntryKind, FrontierEntry, ReviewContext, ReviewType};
pub use seeds::{seed_frontier, seed_urls, ALPHABET};
