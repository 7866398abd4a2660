/// Checks if a domain matches an allowed-domain pattern
///
/// Two pattern forms are supported:
/// 1. Exact match: "metacritic.com" matches only "metacritic.com"
/// 2. Wildcard match: "*.metacritic.com" matches the bare domain and any
///    subdomain at any depth
///
/// Both sides are expected to be lowercase already.
///
/// # Examples
///
/// ```
/// use game_crawler::url::matches_wildcard;
///
/// assert!(matches_wildcard("metacritic.com", "metacritic.com"));
/// assert!(matches_wildcard("*.metacritic.com", "www.metacritic.com"));
/// assert!(!matches_wildcard("*.metacritic.com", "notmetacritic.com"));
/// ```
pub fn matches_wildcard(pattern: &str, candidate: &str) -> bool {
    match pattern.strip_prefix("*.") {
        Some(base) => {
            candidate == base
                || candidate
                    .strip_suffix(base)
                    .is_some_and(|prefix| prefix.ends_with('.'))
        }
        None => candidate == pattern,
    }
}

/// Returns true when `host` is covered by any of the allowed patterns
pub fn is_allowed_host(host: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|pattern| matches_wildcard(pattern, host))
}
