//! Extraction tests over captured page fixtures
//!
//! Each fixture mirrors one page type of the catalog. The functions under
//! test are pure, so no server is involved.

use game_crawler::discover::{discover_listing, next_page, resolve_review_links};
use game_crawler::records::{assemble_game, extract_reviews};
use game_crawler::{EntryKind, FrontierEntry, ReviewContext, ReviewType};
use scraper::Html;
use url::Url;

fn fixture(name: &str) -> Html {
    let path = format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name);
    let html = std::fs::read_to_string(&path).unwrap();
    Html::parse_document(&html)
}

fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

fn context(review_type: ReviewType, slug: &str) -> ReviewContext {
    ReviewContext {
        review_type,
        game_slug: slug.to_string(),
    }
}

#[test]
fn test_listing_items_resolve_to_absolute_detail_urls() {
    let page_url = url("http://www.example.com/browse/games/title/ps4/");
    let entry = FrontierEntry::listing(page_url.clone());

    let entries = discover_listing(&fixture("listing.html"), &entry, &page_url);

    assert_eq!(entries.len(), 3);
    assert!(entries.iter().all(|e| e.kind() == EntryKind::Detail));
    assert!(entries.iter().all(|e| e.context().is_none()));
    assert_eq!(
        entries[0].url().as_str(),
        "http://www.example.com/game/ps4/alpha-strike"
    );
}

#[test]
fn test_malformed_listing_yields_nothing() {
    let page_url = url("http://www.example.com/browse/games/title/ps4/q");
    let entry = FrontierEntry::listing(page_url.clone());

    // A detail page has no listing container
    let entries = discover_listing(&fixture("detail_full.html"), &entry, &page_url);
    assert!(entries.is_empty());
}

#[test]
fn test_review_pages_paginate() {
    let page_url = url("http://www.example.com/game/ps4/alpha-strike/critic-reviews");

    let next = next_page(&fixture("critic_reviews.html"), &page_url).unwrap();
    assert_eq!(next.path(), "/game/ps4/alpha-strike/critic-reviews/2");

    assert!(next_page(&fixture("critic_reviews_page2.html"), &next).is_none());
}

#[test]
fn test_review_links_carry_context() {
    let detail_url = url("http://www.example.com/game/ps4/alpha-strike");

    let entries = resolve_review_links(&fixture("detail_full.html"), &detail_url);

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].context(), Some(&context(ReviewType::Critic, "alpha-strike")));
    assert_eq!(entries[1].context(), Some(&context(ReviewType::User, "alpha-strike")));
    assert_eq!(
        entries[1].url().as_str(),
        "http://www.example.com/game/ps4/alpha-strike/user-reviews"
    );
}

#[test]
fn test_missing_user_link_skips_branch() {
    let detail_url = url("http://www.example.com/game/ps4/beta-quest");

    let entries = resolve_review_links(&fixture("detail_no_user_reviews.html"), &detail_url);

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].review_type(), Some(ReviewType::Critic));
}

#[test]
fn test_game_fields_are_independent() {
    // Only title and platform exist; every other field falls to its default
    let record = assemble_game(
        &fixture("detail_bare.html"),
        &url("http://www.example.com/game/ps4/gamma-run"),
    );

    assert_eq!(record.title, "Gamma Run");
    assert_eq!(record.title_safe, "gamma-run");
    assert_eq!(record.platform, "ps4");
    assert_eq!(record.score_metacritic, "tbd");
    assert_eq!(record.score_users, "tbd");
    for value in [
        &record.publisher,
        &record.developer,
        &record.release_date,
        &record.summary,
        &record.rating,
        &record.genres,
    ] {
        assert_eq!(value, "");
    }
}

#[test]
fn test_game_record_from_full_detail_page() {
    let record = assemble_game(
        &fixture("detail_full.html"),
        &url("http://www.example.com/game/ps4/alpha-strike"),
    );

    assert_eq!(record.publisher, "Northwind|Southwind");
    assert_eq!(record.summary, "A tactical shooter set in Zurich.");
    assert!(record.summary.is_ascii());
    assert!(!record.genres.contains(' '));
}

#[test]
fn test_critic_review_without_full_link() {
    let records = extract_reviews(
        &fixture("critic_reviews_minimal.html"),
        &context(ReviewType::Critic, "beta-quest"),
    );

    assert_eq!(records.len(), 1);
    let review = &records[0];
    assert_eq!(review.score, "80");
    assert_eq!(review.review_date, "Jan 1, 2020");
    assert_eq!(review.reviewer, "Jane Doe");
    assert_eq!(review.review, "Great game.");
    assert_eq!(review.review_url, "");
    assert_eq!(review.title_safe, "beta-quest");
}

#[test]
fn test_critic_review_with_full_link() {
    let records = extract_reviews(
        &fixture("critic_reviews.html"),
        &context(ReviewType::Critic, "alpha-strike"),
    );

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].reviewer, "The Daily Gamer");
    assert_eq!(records[0].review, "Sharp and tense.");
    assert_eq!(records[0].review_url, "https://daily.example/alpha-strike");
}

#[test]
fn test_user_reviews_expanded_and_short_bodies() {
    let records = extract_reviews(
        &fixture("user_reviews.html"),
        &context(ReviewType::User, "alpha-strike"),
    );

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].review, "Loved it. Would play again.");
    assert_eq!(records[1].review, "Too hard.");
    assert!(records.iter().all(|r| r.review_url.is_empty()));
    assert!(records.iter().all(|r| r.reviewer_type == ReviewType::User));
}
