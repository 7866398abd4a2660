//! CSS selectors for catalog pages
//!
//! This file holds every selector the crawler depends on: the de facto wire
//! format of the site. When extraction starts falling back to defaults,
//! capture the page, update the selectors here, and add a fixture.
//!
//! Class tests written as `[class*="a b"]` match a literal substring of the
//! class attribute, so multi-class widgets keep matching when extra classes
//! are appended after the listed ones.

use scraper::Selector;
use std::sync::LazyLock;

fn parse(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {css:?}: {e:?}"))
}

/// Selectors for paginated listing pages.
pub mod listing {
    use super::*;

    /// Result-set container; its absence marks a malformed listing.
    pub static CONTAINER: LazyLock<Selector> = LazyLock::new(|| parse(".product_condensed"));

    /// Title anchor of each listed item.
    pub static ITEM_LINK: LazyLock<Selector> = LazyLock::new(|| {
        parse(".product_condensed > ol > li.product > div > div.product_title > a")
    });
}

/// Pagination control shared by listing and review-index pages.
pub mod pagination {
    use super::*;

    pub static NEXT_PAGE: LazyLock<Selector> =
        LazyLock::new(|| parse("div.page_flipper > span.next > a"));
}

/// Product header present on detail and review-index pages.
pub mod product {
    use super::*;

    pub static TITLE_LINK: LazyLock<Selector> = LazyLock::new(|| parse(".product_title > a"));

    /// Title text wrapped in a span inside the anchor (detail pages).
    pub static TITLE_SPAN: LazyLock<Selector> =
        LazyLock::new(|| parse(".product_title > a span"));

    pub static PLATFORM_LINK: LazyLock<Selector> = LazyLock::new(|| parse(".platform > a"));
}

/// Selectors for game detail pages.
pub mod detail {
    use super::*;

    pub static PUBLISHER: LazyLock<Selector> = LazyLock::new(|| {
        parse(".product_data ul > li.publisher > span.data > a > span")
    });

    pub static RELEASE_DATE: LazyLock<Selector> =
        LazyLock::new(|| parse(".product_data ul > li.release_data > span.data"));

    /// Critic-aggregate score widget.
    pub static METASCORE: LazyLock<Selector> =
        LazyLock::new(|| parse(r#"div[class*="metascore_w xlarge game"]"#));

    pub static METASCORE_SPAN: LazyLock<Selector> =
        LazyLock::new(|| parse(r#"div[class*="metascore_w xlarge game"] span"#));

    /// User-aggregate score widget.
    pub static USERSCORE: LazyLock<Selector> =
        LazyLock::new(|| parse(r#"div[class*="metascore_w user large game"]"#));

    /// Untruncated summary blurb.
    pub static SUMMARY_EXPANDED: LazyLock<Selector> =
        LazyLock::new(|| parse(r#"span[class*="blurb blurb_expanded"]"#));

    pub static SUMMARY_SHORT: LazyLock<Selector> =
        LazyLock::new(|| parse("ul.summary_details > li > span.data > span"));

    pub static DEVELOPER: LazyLock<Selector> =
        LazyLock::new(|| parse(r#"li[class*="summary_detail developer"] span.data"#));

    pub static RATING: LazyLock<Selector> =
        LazyLock::new(|| parse(r#"li[class*="summary_detail product_rating"] span.data"#));

    pub static GENRES: LazyLock<Selector> =
        LazyLock::new(|| parse(r#"li[class*="summary_detail product_genre"] span.data"#));

    /// Navigation entry leading to the critic review index.
    pub static NAV_CRITIC_REVIEWS: LazyLock<Selector> =
        LazyLock::new(|| parse(r#"li[class*="nav nav_critic_reviews"] span > span > a"#));

    /// Navigation entry leading to the user review index.
    pub static NAV_USER_REVIEWS: LazyLock<Selector> =
        LazyLock::new(|| parse(r#"li[class*="nav nav_user_reviews"] span > span > a"#));
}

/// Selectors for review-index pages. Entry-level selectors are evaluated
/// against a single review entry, not the whole page.
pub mod reviews {
    use super::*;

    pub static CONTAINER: LazyLock<Selector> =
        LazyLock::new(|| parse(r#"div[class*="body product_reviews"]"#));

    pub static ENTRY: LazyLock<Selector> = LazyLock::new(|| parse("div.review_content"));

    pub static GRADE: LazyLock<Selector> = LazyLock::new(|| parse("div.review_grade > div"));

    pub static DATE: LazyLock<Selector> = LazyLock::new(|| parse("div.review_critic > div.date"));

    pub static CRITIC_SOURCE_LINK: LazyLock<Selector> =
        LazyLock::new(|| parse("div.review_critic > div.source a"));

    pub static FULL_REVIEW_LINK: LazyLock<Selector> =
        LazyLock::new(|| parse("ul.review_actions > li.full_review > a"));

    pub static USER_NAME_LINK: LazyLock<Selector> =
        LazyLock::new(|| parse("div.review_critic > div.name > a"));

    pub static BODY: LazyLock<Selector> = LazyLock::new(|| parse("div.review_body"));

    pub static BODY_EXPANDED: LazyLock<Selector> =
        LazyLock::new(|| parse(r#"div.review_body span[class*="blurb blurb_expanded"]"#));

    pub static BODY_SHORT: LazyLock<Selector> = LazyLock::new(|| parse("div.review_body span"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn test_selectors_compile() {
        let all: &[&LazyLock<Selector>] = &[
            &listing::CONTAINER,
            &listing::ITEM_LINK,
            &pagination::NEXT_PAGE,
            &product::TITLE_LINK,
            &product::TITLE_SPAN,
            &product::PLATFORM_LINK,
            &detail::PUBLISHER,
            &detail::RELEASE_DATE,
            &detail::METASCORE,
            &detail::METASCORE_SPAN,
            &detail::USERSCORE,
            &detail::SUMMARY_EXPANDED,
            &detail::SUMMARY_SHORT,
            &detail::DEVELOPER,
            &detail::RATING,
            &detail::GENRES,
            &detail::NAV_CRITIC_REVIEWS,
            &detail::NAV_USER_REVIEWS,
            &reviews::CONTAINER,
            &reviews::ENTRY,
            &reviews::GRADE,
            &reviews::DATE,
            &reviews::CRITIC_SOURCE_LINK,
            &reviews::FULL_REVIEW_LINK,
            &reviews::USER_NAME_LINK,
            &reviews::BODY,
            &reviews::BODY_EXPANDED,
            &reviews::BODY_SHORT,
        ];
        for selector in all {
            LazyLock::force(selector);
        }
    }

    #[test]
    fn test_class_substring_matching() {
        let html = Html::parse_document(
            r#"<div class="metascore_w xlarge game positive"><span>92</span></div>
               <div class="metascore_w user large game mixed">6.1</div>"#,
        );
        assert_eq!(html.select(&detail::METASCORE).count(), 1);
        assert_eq!(html.select(&detail::USERSCORE).count(), 1);
    }

    #[test]
    fn test_item_link_requires_listing_structure() {
        let html = Html::parse_document(
            r#"<div class="product_condensed"><ol>
                 <li class="product"><div><div class="product_title"><a href="/game/pc/a">A</a></div></div></li>
               </ol></div>
               <div class="product_title"><a href="/elsewhere">B</a></div>"#,
        );
        assert_eq!(html.select(&listing::ITEM_LINK).count(), 1);
    }
}
