use serde::Serialize;
use std::fmt;
use url::Url;

/// What kind of page a frontier entry points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Paginated index of catalog items
    Listing,
    /// A single game's metadata page
    Detail,
    /// Paginated list of one type of review for one game
    ReviewIndex,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Listing => "listing",
            Self::Detail => "detail",
            Self::ReviewIndex => "review_index",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which review sub-traversal a review-index page belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewType {
    Critic,
    User,
}

impl ReviewType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critic => "critic",
            Self::User => "user",
        }
    }

    /// Parses the stored string form
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "critic" => Some(Self::Critic),
            "user" => Some(Self::User),
            _ => None,
        }
    }
}

impl fmt::Display for ReviewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed context carried by review-index entries
///
/// `game_slug` is the trailing segment of the detail page the review links
/// were resolved from; pagination copies the context unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReviewContext {
    pub review_type: ReviewType,
    pub game_slug: String,
}

/// A not-yet-processed fetch target
///
/// Entries are immutable once created: fields are private and there are no
/// setters. New entries are derived through the constructors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FrontierEntry {
    url: Url,
    kind: EntryKind,
    context: Option<ReviewContext>,
}

impl FrontierEntry {
    pub fn listing(url: Url) -> Self {
        Self {
            url,
            kind: EntryKind::Listing,
            context: None,
        }
    }

    pub fn detail(url: Url) -> Self {
        Self {
            url,
            kind: EntryKind::Detail,
            context: None,
        }
    }

    pub fn review_index(url: Url, context: ReviewContext) -> Self {
        Self {
            url,
            kind: EntryKind::ReviewIndex,
            context: Some(context),
        }
    }

    /// Creates the entry for the next page of the same traversal
    ///
    /// Listing pages stay listings; review-index pages keep their context.
    pub fn next_page(&self, url: Url) -> Self {
        Self {
            url,
            kind: self.kind,
            context: self.context.clone(),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn context(&self) -> Option<&ReviewContext> {
        self.context.as_ref()
    }

    pub fn review_type(&self) -> Option<ReviewType> {
        self.context.as_ref().map(|c| c.review_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_constructors_set_kind() {
        assert_eq!(
            FrontierEntry::listing(url("http://e.com/l")).kind(),
            EntryKind::Listing
        );
        assert_eq!(
            FrontierEntry::detail(url("http://e.com/d")).kind(),
            EntryKind::Detail
        );
        assert!(FrontierEntry::detail(url("http://e.com/d")).context().is_none());
    }

    #[test]
    fn test_next_page_inherits_review_context() {
        let context = ReviewContext {
            review_type: ReviewType::User,
            game_slug: "doom".to_string(),
        };
        let entry = FrontierEntry::review_index(url("http://e.com/game/pc/doom/user-reviews"), context.clone());
        let next = entry.next_page(url("http://e.com/game/pc/doom/user-reviews?page=1"));

        assert_eq!(next.kind(), EntryKind::ReviewIndex);
        assert_eq!(next.context(), Some(&context));
        assert_eq!(next.review_type(), Some(ReviewType::User));
        assert_eq!(next.url().query(), Some("page=1"));
    }

    #[test]
    fn test_next_page_of_listing_is_listing() {
        let entry = FrontierEntry::listing(url("http://e.com/browse/ps4/"));
        let next = entry.next_page(url("http://e.com/browse/ps4/?page=1"));
        assert_eq!(next.kind(), EntryKind::Listing);
        assert!(next.context().is_none());
    }

    #[test]
    fn test_review_type_strings() {
        assert_eq!(ReviewType::Critic.as_str(), "critic");
        assert_eq!(ReviewType::User.to_string(), "user");
        assert_eq!(ReviewType::from_db_string("critic"), Some(ReviewType::Critic));
        assert_eq!(ReviewType::from_db_string("press"), None);
    }
}
