//! Declared rule tables
//!
//! One [`Rule`] per emitted field. Record assembly only ever goes through
//! these tables; no field is extracted with ad hoc selector code.

use super::selectors::{detail, listing, pagination, product, reviews};
use super::{Locator, Rule, Step, ASCII, COMMA_LIST, SLUG, TRIM};

/// Fields shared by detail and review-index pages (the product header)
pub mod header {
    use super::*;

    pub static TITLE: Rule = Rule::new("title", Locator::text(&product::TITLE_SPAN).then(TRIM))
        .or(Locator::text(&product::TITLE_LINK).then(TRIM));

    pub static PLATFORM: Rule =
        Rule::new("platform", Locator::attr(&product::PLATFORM_LINK, "href").then(SLUG));
}

/// GameRecord fields
pub mod game {
    use super::*;

    pub use super::header::{PLATFORM, TITLE};

    pub static PUBLISHER: Rule =
        Rule::new("publisher", Locator::text(&detail::PUBLISHER).all().then(TRIM));

    pub static RELEASE_DATE: Rule =
        Rule::new("release_date", Locator::text(&detail::RELEASE_DATE).then(TRIM));

    pub static SCORE_METACRITIC: Rule = Rule::new(
        "score_metacritic",
        Locator::text(&detail::METASCORE_SPAN).then(TRIM),
    )
    .or(Locator::text(&detail::METASCORE).then(TRIM))
    .default_to("tbd");

    pub static SCORE_USERS: Rule =
        Rule::new("score_users", Locator::text(&detail::USERSCORE).then(TRIM)).default_to("tbd");

    /// Expanded blurb first, short-form summary second
    pub static SUMMARY: Rule =
        Rule::new("summary", Locator::text(&detail::SUMMARY_EXPANDED).then(ASCII))
            .or(Locator::text(&detail::SUMMARY_SHORT).then(ASCII));

    pub static DEVELOPER: Rule = Rule::new(
        "developer",
        Locator::text(&detail::DEVELOPER).all().then(COMMA_LIST),
    );

    pub static RATING: Rule = Rule::new("rating", Locator::text(&detail::RATING).then(TRIM));

    pub static GENRES: Rule =
        Rule::new("genres", Locator::text(&detail::GENRES).all().then(COMMA_LIST));
}

/// ReviewRecord fields, evaluated against a single review entry
pub mod review {
    use super::*;

    const USER_EXPANDED: &[Step] = &[
        Step::CollapseCarriageReturns,
        Step::Transliterate,
        Step::Trim,
    ];

    pub static SCORE: Rule = Rule::new("score", Locator::text(&reviews::GRADE).then(TRIM));

    pub static DATE: Rule = Rule::new("review_date", Locator::text(&reviews::DATE).then(TRIM));

    /// Publication anchor text only; a source without an anchor yields ""
    pub static CRITIC_REVIEWER: Rule = Rule::new(
        "reviewer",
        Locator::text(&reviews::CRITIC_SOURCE_LINK).then(TRIM),
    );

    pub static CRITIC_BODY: Rule = Rule::new("review", Locator::text(&reviews::BODY).then(ASCII));

    pub static CRITIC_URL: Rule = Rule::new(
        "review_url",
        Locator::attr(&reviews::FULL_REVIEW_LINK, "href").then(TRIM),
    );

    pub static USER_REVIEWER: Rule =
        Rule::new("reviewer", Locator::text(&reviews::USER_NAME_LINK).then(TRIM));

    /// Expanded body concatenated when present, else the first short fragment
    pub static USER_BODY: Rule = Rule::new(
        "review",
        Locator::text(&reviews::BODY_EXPANDED)
            .concat()
            .then(USER_EXPANDED),
    )
    .or(Locator::text(&reviews::BODY_SHORT).then(ASCII));
}

/// Link locators used by discovery
pub mod links {
    use super::*;

    pub static NEXT_PAGE: Rule =
        Rule::new("next_page", Locator::attr(&pagination::NEXT_PAGE, "href"));

    pub static ITEM_LINKS: Rule =
        Rule::new("item_links", Locator::attr(&listing::ITEM_LINK, "href").all());

    pub static CRITIC_REVIEWS: Rule = Rule::new(
        "critic_reviews",
        Locator::attr(&detail::NAV_CRITIC_REVIEWS, "href"),
    );

    pub static USER_REVIEWS: Rule =
        Rule::new("user_reviews", Locator::attr(&detail::NAV_USER_REVIEWS, "href"));
}
