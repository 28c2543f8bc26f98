//! Query-term highlighting.
//!
//! Matches are found in a single pass over the text. Terms are compiled into one
//! case-insensitive alternation ordered longest first, so among terms that start at
//! the same position the longest wins, and a matched region is never wrapped twice.
//! Matching is plain substring matching: `cat` highlights inside `Category`.

use std::{collections::HashSet, ops::Range};

use regex::{Regex, RegexBuilder};
use thiserror::Error;

/// Default opening highlight marker.
pub const DEFAULT_OPEN: &str = "<b>";

/// Default closing highlight marker.
pub const DEFAULT_CLOSE: &str = "</b>";

/// Errors raised while compiling a term matcher.
#[derive(Debug, Error)]
pub enum HighlightError {
    /// The combined term pattern could not be compiled (usually a size limit).
    #[error("failed to compile highlight pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Finds query terms in text.
#[derive(Debug, Clone)]
pub struct TermHighlighter {
    /// Compiled alternation of escaped terms; `None` when there are no terms.
    pattern: Option<Regex>,
}

impl TermHighlighter {
    /// Returns a highlighter that matches nothing.
    pub fn none() -> Self {
        Self { pattern: None }
    }

    /// Compiles a highlighter for the given terms.
    ///
    /// Empty terms and duplicates are ignored. Terms are escaped, so characters such
    /// as `/`, `+` or `(` match literally.
    pub fn new<S: AsRef<str>>(terms: &[S]) -> Result<Self, HighlightError> {
        let mut seen = HashSet::new();
        let mut distinct: Vec<&str> = terms
            .iter()
            .map(AsRef::as_ref)
            .filter(|term| !term.is_empty() && seen.insert(term.to_lowercase()))
            .collect();

        if distinct.is_empty() {
            return Ok(Self::none());
        }

        // Longest first: the regex engine prefers earlier alternatives at a position.
        distinct.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let alternation = distinct
            .iter()
            .map(|term| regex::escape(term))
            .collect::<Vec<_>>()
            .join("|");

        let pattern = RegexBuilder::new(&alternation)
            .case_insensitive(true)
            .build()?;

        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// Returns the merged match spans for `text`.
    ///
    /// Spans are byte ranges, sorted, non-overlapping, with adjacent matches merged.
    pub fn spans(&self, text: &str) -> Vec<Range<usize>> {
        let Some(pattern) = &self.pattern else {
            return Vec::new();
        };

        let ranges = pattern.find_iter(text).map(|m| m.range()).collect();
        merge_ranges(ranges, Vec::new())
    }

    /// Highlights `text`, returning the text together with its match spans.
    pub fn highlight(&self, text: &str) -> Highlighted {
        Highlighted {
            spans: self.spans(text),
            text: text.to_string(),
        }
    }
}

/// Text with the byte ranges of its query-term matches.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Highlighted {
    /// The original, unmodified text.
    pub text: String,
    /// Sorted, non-overlapping match spans into `text`.
    pub spans: Vec<Range<usize>>,
}

impl Highlighted {
    /// Creates a value with no highlighted spans.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            spans: Vec::new(),
        }
    }

    /// Returns true if any span was matched.
    pub fn has_matches(&self) -> bool {
        !self.spans.is_empty()
    }

    /// Rewrites the text once, wrapping every span in `open`/`close`.
    pub fn render(&self, open: &str, close: &str) -> String {
        let extra = self.spans.len() * (open.len() + close.len());
        let mut out = String::with_capacity(self.text.len() + extra);
        let mut cursor = 0;

        for span in &self.spans {
            out.push_str(&self.text[cursor..span.start]);
            out.push_str(open);
            out.push_str(&self.text[span.clone()]);
            out.push_str(close);
            cursor = span.end;
        }
        out.push_str(&self.text[cursor..]);
        out
    }

    /// Renders with the default `<b>`/`</b>` markers.
    pub fn render_default(&self) -> String {
        self.render(DEFAULT_OPEN, DEFAULT_CLOSE)
    }
}

/// Merges two sets of byte ranges, combining overlapping or adjacent ranges.
///
/// The result is sorted by start position with no overlaps.
pub fn merge_ranges(mut a: Vec<Range<usize>>, b: Vec<Range<usize>>) -> Vec<Range<usize>> {
    a.extend(b);
    if a.is_empty() {
        return a;
    }

    a.sort_by_key(|r| r.start);

    let mut merged = Vec::with_capacity(a.len());
    let mut current = a[0].clone();

    for range in a.into_iter().skip(1) {
        if range.start <= current.end {
            current.end = current.end.max(range.end);
        } else {
            merged.push(current);
            current = range;
        }
    }
    merged.push(current);

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mark(text: &str, terms: &[&str]) -> String {
        TermHighlighter::new(terms)
            .unwrap()
            .highlight(text)
            .render_default()
    }

    #[test]
    fn oversized_pattern_is_an_error() {
        let long = "k".repeat(200_000);
        assert!(matches!(
            TermHighlighter::new(&[long.as_str()]),
            Err(HighlightError::Pattern(_))
        ));
    }

    #[test]
    fn none_leaves_text_plain() {
        let out = TermHighlighter::none().highlight("cat");
        assert_eq!(out, Highlighted::plain("cat"));
    }

    #[test]
    fn substring_case_insensitive() {
        assert_eq!(mark("The Category", &["cat"]), "The <b>Cat</b>egory");
    }

    #[test]
    fn non_matching_text_unchanged() {
        assert_eq!(mark("Dog", &["cat"]), "Dog");
    }

    #[test]
    fn longest_term_wins_at_same_start() {
        assert_eq!(
            mark("The Category", &["cat", "category"]),
            "The <b>Category</b>"
        );
        // Order of terms must not matter.
        assert_eq!(
            mark("The Category", &["category", "cat"]),
            "The <b>Category</b>"
        );
    }

    #[test]
    fn no_double_wrapping() {
        let out = mark("category cat", &["cat", "category", "ego"]);
        assert_eq!(out, "<b>category</b> <b>cat</b>");
        assert_eq!(out.matches("<b>").count(), 2);
    }

    #[test]
    fn every_occurrence_marked() {
        assert_eq!(mark("cat, CAT and Cat", &["cat"]), "<b>cat</b>, <b>CAT</b> and <b>Cat</b>");
    }

    #[test]
    fn adjacent_matches_merge() {
        assert_eq!(mark("catdog", &["cat", "dog"]), "<b>catdog</b>");
    }

    #[test]
    fn special_characters_are_literal() {
        assert_eq!(mark("see /usr/bin now", &["/usr/bin"]), "see <b>/usr/bin</b> now");
        assert_eq!(mark("c++ or c", &["c++"]), "<b>c++</b> or c");
        assert_eq!(mark("a.b axb", &["a.b"]), "<b>a.b</b> axb");
    }

    #[test]
    fn empty_terms_leave_text_alone() {
        let empty: [&str; 0] = [];
        assert_eq!(mark("anything", &empty), "anything");
        assert_eq!(mark("anything", &[""]), "anything");
    }

    #[test]
    fn duplicate_terms_ignored() {
        assert_eq!(mark("cat", &["cat", "CAT", "cat"]), "<b>cat</b>");
    }

    #[test]
    fn unicode_spans_on_char_boundaries() {
        let hl = TermHighlighter::new(&["äpfel"]).unwrap().highlight("Grüne ÄPFEL");
        assert_eq!(hl.render("[", "]"), "Grüne [ÄPFEL]");
    }

    #[test]
    fn custom_markers() {
        let hl = TermHighlighter::new(&["rust"]).unwrap().highlight("Rust book");
        assert_eq!(hl.render("<mark>", "</mark>"), "<mark>Rust</mark> book");
        assert!(hl.has_matches());
        assert!(!Highlighted::plain("x").has_matches());
    }

    #[test]
    fn merge_ranges_combines_overlapping() {
        let a = vec![0..5, 10..15];
        let b = vec![3..8, 20..25];
        assert_eq!(merge_ranges(a, b), vec![0..8, 10..15, 20..25]);
    }

    #[test]
    #[allow(clippy::single_range_in_vec_init)]
    fn merge_ranges_combines_adjacent() {
        assert_eq!(merge_ranges(vec![0..5], vec![5..10]), vec![0..10]);
    }

    #[test]
    fn merge_ranges_handles_empty() {
        assert!(merge_ranges(Vec::new(), Vec::new()).is_empty());
    }
}
