use super::ReviewRecord;
use crate::extract::rules::{header, review};
use crate::extract::selectors::reviews;
use crate::frontier::{ReviewContext, ReviewType};
use scraper::{ElementRef, Html};

/// Extracts every review entry on a review-index page
///
/// Title and platform come from the page header; everything else is scoped
/// to the individual entry. The reviewer and body rules depend on the
/// inherited review type. A page without the review list yields nothing.
pub fn extract_reviews(document: &Html, context: &ReviewContext) -> Vec<ReviewRecord> {
    let root = document.root_element();
    let title = header::TITLE.resolve(root);
    let platform = header::PLATFORM.resolve(root);

    document
        .select(&reviews::CONTAINER)
        .flat_map(|container| container.select(&reviews::ENTRY))
        .map(|entry| {
            let (reviewer, body, review_url) = match context.review_type {
                ReviewType::Critic => critic_fields(entry, &title),
                ReviewType::User => user_fields(entry),
            };

            ReviewRecord {
                title: title.clone(),
                title_safe: context.game_slug.clone(),
                platform: platform.clone(),
                reviewer,
                reviewer_type: context.review_type,
                score: review::SCORE.resolve(entry),
                review_date: review::DATE.resolve(entry),
                review: body,
                review_url,
            }
        })
        .collect()
}

fn critic_fields(entry: ElementRef<'_>, title: &str) -> (String, String, String) {
    let review_url = review::CRITIC_URL.resolve_opt(entry).unwrap_or_else(|| {
        tracing::warn!(title = %title, "Critic URL not available");
        review::CRITIC_URL.default_value().to_string()
    });

    (
        review::CRITIC_REVIEWER.resolve(entry),
        review::CRITIC_BODY.resolve(entry),
        review_url,
    )
}

fn user_fields(entry: ElementRef<'_>) -> (String, String, String) {
    (
        review::USER_REVIEWER.resolve(entry),
        review::USER_BODY.resolve(entry),
        String::new(),
    )
}
