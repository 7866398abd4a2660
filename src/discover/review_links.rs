use crate::extract::rules::links;
use crate::extract::Rule;
use crate::frontier::{FrontierEntry, ReviewContext, ReviewType};
use crate::url::{resolve_link, slug_from_url};
use scraper::Html;
use url::Url;

/// Resolves the critic and user review-index entry points of a detail page
///
/// Each entry carries a [`ReviewContext`] with its review type and the
/// detail page's slug. A missing navigation link skips that branch only.
pub fn resolve_review_links(document: &Html, detail_url: &Url) -> Vec<FrontierEntry> {
    let game_slug = slug_from_url(detail_url);

    [
        (ReviewType::Critic, &links::CRITIC_REVIEWS),
        (ReviewType::User, &links::USER_REVIEWS),
    ]
    .into_iter()
    .filter_map(|(review_type, rule)| {
        let url = resolve_nav_link(document, detail_url, rule);
        if url.is_none() {
            tracing::debug!(
                url = %detail_url,
                review_type = %review_type,
                "No review link, skipping branch"
            );
        }
        url.map(|url| {
            FrontierEntry::review_index(
                url,
                ReviewContext {
                    review_type,
                    game_slug: game_slug.clone(),
                },
            )
        })
    })
    .collect()
}

fn resolve_nav_link(document: &Html, detail_url: &Url, rule: &Rule) -> Option<Url> {
    let href = rule.resolve_opt(document.root_element())?;
    resolve_link(&href, detail_url)
}
