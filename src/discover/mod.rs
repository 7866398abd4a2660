//! Link discovery
//!
//! Turns a fetched document into new frontier entries. Listing pages yield a
//! pagination entry and one detail entry per listed item; detail pages yield
//! up to two review-index entries; review-index pages yield only their own
//! next page. Every function here is a pure function of one document.

mod listing;
mod review_links;

pub use listing::discover_listing;
pub use review_links::resolve_review_links;

use crate::extract::rules::links;
use crate::url::resolve_link;
use scraper::Html;
use url::Url;

/// Locates the "next page" control and resolves it against `page_url`
///
/// Listing pages and review-index pages share this rule. Returns `None` when
/// the control is absent or its href does not resolve, which terminates the
/// paginated traversal.
pub fn next_page(document: &Html, page_url: &Url) -> Option<Url> {
    let href = links::NEXT_PAGE.resolve_opt(document.root_element())?;
    let next = resolve_link(&href, page_url);
    if next.is_none() {
        tracing::debug!(href = %href, page = %page_url, "Unresolvable next-page link");
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_url() -> Url {
        Url::parse("http://www.example.com/browse/games/title/ps4/a").unwrap()
    }

    #[test]
    fn test_next_page_resolves_relative_href() {
        let html = Html::parse_document(
            r#"<div class="page_flipper"><span class="next"><a href="/browse/games/title/ps4/a?page=1">next</a></span></div>"#,
        );
        let next = next_page(&html, &page_url()).unwrap();
        assert_eq!(next.as_str(), "http://www.example.com/browse/games/title/ps4/a?page=1");
    }

    #[test]
    fn test_no_next_page_on_last_page() {
        let html = Html::parse_document(
            r#"<div class="page_flipper"><span class="next"><span>next</span></span></div>"#,
        );
        assert!(next_page(&html, &page_url()).is_none());
    }

    #[test]
    fn test_unresolvable_next_page() {
        let html = Html::parse_document(
            r#"<div class="page_flipper"><span class="next"><a href="javascript:void(0)">next</a></span></div>"#,
        );
        assert!(next_page(&html, &page_url()).is_none());
    }
}
