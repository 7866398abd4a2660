use super::next_page;
use crate::extract::rules::links;
use crate::extract::selectors::listing;
use crate::frontier::FrontierEntry;
use crate::url::resolve_link;
use scraper::Html;
use url::Url;

/// Discovers the entries reachable from a listing page
///
/// The pagination entry (if any) comes first, followed by one DETAIL entry
/// per listed item in document order. A page without the result-set
/// container is treated as malformed and yields nothing. Links resolve
/// against `page_url`, the URL the document was actually served from.
pub fn discover_listing(document: &Html, entry: &FrontierEntry, page_url: &Url) -> Vec<FrontierEntry> {
    if document.select(&listing::CONTAINER).next().is_none() {
        tracing::warn!(url = %page_url, "Listing container missing, skipping page");
        return Vec::new();
    }

    let mut discovered = Vec::new();

    if let Some(next) = next_page(document, page_url) {
        discovered.push(entry.next_page(next));
    }

    let hrefs = links::ITEM_LINKS
        .resolve_values(document.root_element())
        .unwrap_or_default();

    for href in hrefs {
        match resolve_link(&href, page_url) {
            Some(url) => discovered.push(FrontierEntry::detail(url)),
            None => tracing::debug!(href = %href, "Skipping unresolvable item link"),
        }
    }

    tracing::debug!(
        url = %page_url,
        discovered = discovered.len(),
        "Listing page discovered entries"
    );

    discovered
}
