use super::GameRecord;
use crate::extract::rules::game;
use crate::url::slug_from_url;
use scraper::Html;
use url::Url;

/// Assembles the GameRecord of a detail page
///
/// Fields are resolved independently; a missing block only affects its own
/// field. `title_safe` is the detail page's trailing path segment.
pub fn assemble_game(document: &Html, page_url: &Url) -> GameRecord {
    let root = document.root_element();

    GameRecord {
        title: game::TITLE.resolve(root),
        title_safe: slug_from_url(page_url),
        platform: game::PLATFORM.resolve(root),
        publisher: game::PUBLISHER.resolve(root),
        developer: game::DEVELOPER.resolve(root),
        release_date: game::RELEASE_DATE.resolve(root),
        score_metacritic: game::SCORE_METACRITIC.resolve(root),
        score_users: game::SCORE_USERS.resolve(root),
        summary: game::SUMMARY.resolve(root),
        rating: game::RATING.resolve(root),
        genres: game::GENRES.resolve(root),
    }
}
