//! Field extraction engine
//!
//! Every field the crawler emits is described by a [`Rule`]: a primary
//! [`Locator`], an optional fallback locator, and a default value. A rule is
//! resolved in three tiers:
//!
//! 1. evaluate the primary locator; if it yields values, post-process them
//! 2. otherwise evaluate the fallback locator the same way
//! 3. otherwise return the declared default
//!
//! A locator names a selector, what to read from each match (own text or an
//! attribute), how many matches to take, and the post-processing [`Step`]s.
//! Resolution is a pure function of (scope element, rule): it never mutates
//! the document and never fails. Multi-valued results are joined with `|`.
//!
//! # Example
//!
//! ```
//! use game_crawler::extract::rules;
//! use scraper::Html;
//!
//! let html = Html::parse_document("<html><body><p>no score widget</p></body></html>");
//! assert_eq!(rules::game::SCORE_METACRITIC.resolve(html.root_element()), "tbd");
//! ```

pub mod rules;
pub mod selectors;
pub mod text;

use crate::url::last_path_segment;
use scraper::{ElementRef, Selector};
use std::sync::LazyLock;

/// What a locator reads from a matched element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Read {
    /// The element's own text nodes (not its descendants')
    Text,
    /// The value of the named attribute
    Attr(&'static str),
}

/// How many matches a locator takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Take {
    /// First non-blank value in document order
    First,
    /// One value per non-blank match in document order; empty pieces dropped
    All,
    /// All text fragments of the first match concatenated into one value
    Concat,
}

/// Post-processing applied to each located value, in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Trim,
    Transliterate,
    CollapseCarriageReturns,
    LastPathSegment,
    /// Splits one value into several
    Split(char),
}

impl Step {
    fn apply(self, value: String) -> Vec<String> {
        match self {
            Step::Trim => vec![value.trim().to_string()],
            Step::Transliterate => vec![text::transliterate(&value)],
            Step::CollapseCarriageReturns => vec![text::collapse_carriage_returns(&value)],
            Step::LastPathSegment => vec![last_path_segment(&value).to_string()],
            Step::Split(separator) => value.split(separator).map(str::to_string).collect(),
        }
    }
}

/// Common step sequences
pub const TRIM: &[Step] = &[Step::Trim];
pub const ASCII: &[Step] = &[Step::Transliterate, Step::Trim];
pub const SLUG: &[Step] = &[Step::LastPathSegment, Step::Trim];
pub const COMMA_LIST: &[Step] = &[Step::Split(','), Step::Trim];

/// Where to find a value in a document
#[derive(Debug, Clone, Copy)]
pub struct Locator {
    selector: &'static LazyLock<Selector>,
    read: Read,
    take: Take,
    steps: &'static [Step],
}

impl Locator {
    /// Reads the first non-blank own text of the matches
    pub const fn text(selector: &'static LazyLock<Selector>) -> Self {
        Self {
            selector,
            read: Read::Text,
            take: Take::First,
            steps: &[],
        }
    }

    /// Reads the first non-blank value of `name` among the matches
    pub const fn attr(selector: &'static LazyLock<Selector>, name: &'static str) -> Self {
        Self {
            selector,
            read: Read::Attr(name),
            take: Take::First,
            steps: &[],
        }
    }

    /// Takes every match instead of the first
    pub const fn all(mut self) -> Self {
        self.take = Take::All;
        self
    }

    /// Concatenates every text fragment of the first match
    pub const fn concat(mut self) -> Self {
        self.take = Take::Concat;
        self
    }

    /// Sets the post-processing steps
    pub const fn then(mut self, steps: &'static [Step]) -> Self {
        self.steps = steps;
        self
    }

    /// Evaluates the locator within `scope`
    ///
    /// Returns `None` when nothing was located. `Concat` locates as soon as
    /// the element exists, even if it holds no text.
    pub fn evaluate(&self, scope: ElementRef<'_>) -> Option<Vec<String>> {
        let mut matches = scope.select(self.selector);

        let raw: Vec<String> = match self.take {
            Take::Concat => vec![matches.next()?.text().collect()],
            Take::First => vec![matches.find_map(|el| self.read_all(el).into_iter().next())?],
            Take::All => matches.filter_map(|el| self.read_joined(el)).collect(),
        };

        if raw.is_empty() {
            return None;
        }

        let values: Vec<String> = self.steps.iter().fold(raw, |values, step| {
            values.into_iter().flat_map(|v| step.apply(v)).collect()
        });

        match self.take {
            // Pieces left empty by a split carry no source text
            Take::All => {
                let values: Vec<String> = values.into_iter().filter(|v| !v.is_empty()).collect();
                (!values.is_empty()).then_some(values)
            }
            Take::First | Take::Concat => Some(values),
        }
    }

    /// One value per matched element: its own text nodes joined, or the attribute
    fn read_joined(&self, element: ElementRef<'_>) -> Option<String> {
        let value = match self.read {
            Read::Text => own_text(element).collect::<String>(),
            Read::Attr(name) => element.value().attr(name)?.to_string(),
        };
        (!value.trim().is_empty()).then_some(value)
    }

    fn read_all(&self, element: ElementRef<'_>) -> Vec<String> {
        match self.read {
            Read::Text => own_text(element)
                .filter(|t| !t.trim().is_empty())
                .map(str::to_string)
                .collect(),
            Read::Attr(name) => element
                .value()
                .attr(name)
                .filter(|v| !v.trim().is_empty())
                .map(str::to_string)
                .into_iter()
                .collect(),
        }
    }
}

/// One field's extraction rule: primary locator, optional fallback, default
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    field: &'static str,
    primary: Locator,
    fallback: Option<Locator>,
    default: &'static str,
}

impl Rule {
    /// Creates a rule with an empty-string default and no fallback
    pub const fn new(field: &'static str, primary: Locator) -> Self {
        Self {
            field,
            primary,
            fallback: None,
            default: "",
        }
    }

    pub const fn or(mut self, fallback: Locator) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub const fn default_to(mut self, default: &'static str) -> Self {
        self.default = default;
        self
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn default_value(&self) -> &'static str {
        self.default
    }

    /// Resolves the individual values through primary then fallback
    pub fn resolve_values(&self, scope: ElementRef<'_>) -> Option<Vec<String>> {
        self.primary.evaluate(scope).or_else(|| {
            let fallback = self.fallback?;
            tracing::trace!(field = self.field, "primary locator empty, trying fallback");
            fallback.evaluate(scope)
        })
    }

    /// Resolves the pipe-joined value, or `None` if neither locator matched
    pub fn resolve_opt(&self, scope: ElementRef<'_>) -> Option<String> {
        self.resolve_values(scope)
            .map(|values| text::join_values(&values))
    }

    /// Resolves the pipe-joined value, falling back to the declared default
    pub fn resolve(&self, scope: ElementRef<'_>) -> String {
        self.resolve_opt(scope).unwrap_or_else(|| {
            tracing::trace!(field = self.field, "no match, using default");
            self.default.to_string()
        })
    }
}

/// Iterates over an element's direct text children
pub fn own_text<'a>(element: ElementRef<'a>) -> impl Iterator<Item = &'a str> + 'a {
    element
        .children()
        .filter_map(|node| node.value().as_text())
        .map(|text| &**text)
}
