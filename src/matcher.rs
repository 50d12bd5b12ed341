//! Local typeahead matching
//!
//! Optional helper for hosts without a remote refresh pipeline: filters the
//! choices by the current search string with fuzzy matching. The state
//! machine itself never filters; the host derives a narrowed snapshot here
//! and feeds it back through the regular projection path.

use nucleo::pattern::{CaseMatching, Normalization, Pattern};
use nucleo::{Config, Matcher, Utf32String};
use serde_json::Value;

/// Reusable fuzzy matcher over choice display texts.
pub struct SearchMatcher {
    matcher: Matcher,
}

impl Default for SearchMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchMatcher {
    /// Create a matcher with the default scoring configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            matcher: Matcher::new(Config::DEFAULT),
        }
    }

    /// Indices of the texts matching `search`, best score first; ties keep
    /// source order. An empty search matches everything in source order.
    pub fn filter(&mut self, texts: &[String], search: &str) -> Vec<usize> {
        if search.is_empty() {
            return (0..texts.len()).collect();
        }
        let pattern = Pattern::parse(search, CaseMatching::Ignore, Normalization::Smart);
        let mut scored: Vec<(usize, u32)> = texts
            .iter()
            .enumerate()
            .filter_map(|(index, text)| {
                let haystack = Utf32String::from(text.as_str());
                pattern
                    .score(haystack.slice(..), &mut self.matcher)
                    .map(|score| (index, score))
            })
            .collect();
        scored.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.into_iter().map(|(index, _)| index).collect()
    }

    /// Filter choice items by `search`, rendering each through `display`.
    pub fn filter_items<F>(&mut self, items: &[Value], search: &str, display: F) -> Vec<usize>
    where
        F: Fn(&Value) -> String,
    {
        let texts: Vec<String> = items.iter().map(display).collect();
        self.filter(&texts, search)
    }
}
