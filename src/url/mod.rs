//! URL handling module
//!
//! This module provides link resolution, URL normalization for frontier
//! deduplication, allowed-domain matching and path-slug helpers.

mod domain;
mod matcher;
mod normalize;

use url::Url;

// Re-export main functions
pub use domain::{extract_domain, last_path_segment, slug_from_url};
pub use matcher::{is_allowed_host, matches_wildcard};
pub use normalize::normalize_url;

/// Resolves a link href against the page it was found on
///
/// Returns None if the link should not be followed:
/// - empty or fragment-only hrefs
/// - `javascript:`, `mailto:`, `tel:` and `data:` schemes
/// - hrefs that fail to resolve
/// - non-HTTP(S) URLs after resolution
///
/// # Examples
///
/// ```
/// use url::Url;
/// use game_crawler::url::resolve_link;
///
/// let base = Url::parse("http://www.example.com/browse/games/title/ps4/").unwrap();
/// let link = resolve_link("/game/playstation-4/bloodborne", &base).unwrap();
/// assert_eq!(link.as_str(), "http://www.example.com/game/playstation-4/bloodborne");
/// ```
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    match absolute.scheme() {
        "http" | "https" => Some(absolute),
        _ => None,
    }
}
