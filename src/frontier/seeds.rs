//! Seed generator
//!
//! The initial frontier is the union of one unfiltered listing per platform
//! and one listing per (platform, letter) shard, sorted by URL.

use crate::frontier::FrontierEntry;
use crate::UrlError;
use url::Url;

/// Alphabetic shards appended to each platform listing
pub const ALPHABET: [char; 26] = [
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r',
    's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

/// Builds the seed URL strings: `base/<platform>/` and `base/<platform>/<letter>`
///
/// Pure function of its inputs; the result is sorted lexicographically and
/// holds each URL once, even when a platform is listed twice.
///
/// # Examples
///
/// ```
/// use game_crawler::frontier::seed_urls;
///
/// let seeds = seed_urls("http://site/browse/", &["pc".to_string()]);
/// assert_eq!(seeds.len(), 27);
/// assert_eq!(seeds[0], "http://site/browse/pc/");
/// assert_eq!(seeds[1], "http://site/browse/pc/a");
/// ```
pub fn seed_urls(base_url: &str, platforms: &[String]) -> Vec<String> {
    let platform_roots: Vec<String> = platforms
        .iter()
        .map(|platform| format!("{}{}/", base_url, platform))
        .collect();

    let mut seeds: Vec<String> = platform_roots
        .iter()
        .flat_map(|root| ALPHABET.iter().map(move |letter| format!("{}{}", root, letter)))
        .collect();

    seeds.extend(platform_roots);
    seeds.sort();
    seeds.dedup();
    seeds
}

/// Builds the seed frontier as LISTING entries
pub fn seed_frontier(base_url: &str, platforms: &[String]) -> Result<Vec<FrontierEntry>, UrlError> {
    seed_urls(base_url, platforms)
        .iter()
        .map(|seed| {
            Url::parse(seed)
                .map(FrontierEntry::listing)
                .map_err(|e| UrlError::Parse(format!("{}: {}", seed, e)))
        })
        .collect()
}
