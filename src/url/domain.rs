use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use game_crawler::url::extract_domain;
///
/// let url = Url::parse("https://WWW.Metacritic.com/game/pc/doom").unwrap();
/// assert_eq!(extract_domain(&url), Some("www.metacritic.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns the trailing path segment of a URL string
///
/// Mirrors splitting on `/` and taking the last piece, so a trailing slash
/// yields an empty segment. Query and fragment are ignored.
pub fn last_path_segment(href: &str) -> &str {
    let path = href
        .split(|c: char| c == '?' || c == '#')
        .next()
        .unwrap_or(href);
    path.rsplit('/').next().unwrap_or(path)
}

/// Derives a URL slug from a page URL: its last non-empty path segment
///
/// `https://site/game/ps4/the-witcher-3/` gives `the-witcher-3`.
pub fn slug_from_url(url: &Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .unwrap_or_default()
        .to_string()
}
