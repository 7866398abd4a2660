//! Text normalization applied to extracted values

use regex::Regex;
use std::sync::LazyLock;

/// Separator used to serialize multi-valued fields
pub const PIPE: &str = "|";

/// Transliterates text to plain ASCII ("Pokémon" becomes "Pokemon")
pub fn transliterate(text: &str) -> String {
    deunicode::deunicode(text)
}

/// Runs of carriage returns inside review bodies
static CARRIAGE_RETURNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r+").unwrap_or_else(|e| panic!("invalid pattern: {e}")));

/// Replaces every run of carriage returns with a single space
pub fn collapse_carriage_returns(text: &str) -> String {
    CARRIAGE_RETURNS.replace_all(text, " ").into_owned()
}

/// Joins values in order with the pipe separator
pub fn join_values<S: AsRef<str>>(values: &[S]) -> String {
    values
        .iter()
        .map(|v| v.as_ref())
        .collect::<Vec<_>>()
        .join(PIPE)
}
