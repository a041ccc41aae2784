//! Toolbar free-text search

use nucleo_matcher::Config;
use nucleo_matcher::Matcher;
use nucleo_matcher::Utf32Str;
use nucleo_matcher::pattern::AtomKind;
use nucleo_matcher::pattern::CaseMatching;
use nucleo_matcher::pattern::Normalization;
use nucleo_matcher::pattern::Pattern;

/// A compiled search query.
///
/// Each whitespace-separated word must occur in the row's searchable text,
/// ignoring case. Matching never reorders rows.
#[derive(Default)]
pub struct SearchQuery {
    text: String,
    pattern: Option<Pattern>,
}

impl SearchQuery {
    pub fn new(text: &str) -> Self {
        let trimmed = text.trim();
        let pattern = (!trimmed.is_empty())
            .then(|| Pattern::new(trimmed, CaseMatching::Ignore, Normalization::Smart, AtomKind::Substring));
        Self {
            text: trimmed.to_string(),
            pattern,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_none()
    }

    /// Returns the positions of `haystacks` that match, in input order.
    pub fn filter<'a>(&self, haystacks: impl IntoIterator<Item = (usize, &'a str)>) -> Vec<usize> {
        let Some(pattern) = &self.pattern else {
            return haystacks.into_iter().map(|(index, _)| index).collect();
        };
        let mut matcher = Matcher::new(Config::DEFAULT);
        let mut buf = Vec::new();
        haystacks
            .into_iter()
            .filter_map(|(index, text)| {
                let haystack = Utf32Str::new(text, &mut buf);
                pattern.score(haystack, &mut matcher).map(|_| index)
            })
            .collect()
    }
}

impl std::fmt::Debug for SearchQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SearchQuery").field(&self.text).finish()
    }
}

impl Clone for SearchQuery {
    fn clone(&self) -> Self {
        Self::new(&self.text)
    }
}
