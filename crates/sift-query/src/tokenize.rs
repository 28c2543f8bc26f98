//! Query tokenizer.
//!
//! Normalizes a raw query string and splits it into search terms.

use std::collections::HashSet;

/// A tokenized search query.
///
/// A `Query` always holds at least one term. Inputs that produce no terms are
/// represented by the absence of a query (`None` from [`Query::parse`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// The query string exactly as received.
    raw: String,
    /// The lower-cased query string.
    normalized: String,
    /// Terms in input order, duplicates preserved.
    terms: Vec<String>,
}

impl Query {
    /// Parses a raw query string.
    ///
    /// Returns `None` when the string contains no terms (empty or whitespace only).
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.to_lowercase();
        let terms = tokenize(&normalized);
        if terms.is_empty() {
            return None;
        }

        Some(Self {
            raw: raw.to_string(),
            normalized,
            terms,
        })
    }

    /// Parses an optional query parameter.
    ///
    /// An absent parameter means no search was requested.
    pub fn from_param(raw: Option<&str>) -> Option<Self> {
        raw.and_then(Self::parse)
    }

    /// Returns the query string as received.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Returns the lower-cased query string.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Returns all terms in input order, including duplicates.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Returns the distinct terms in first-seen order.
    pub fn distinct_terms(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.terms
            .iter()
            .map(String::as_str)
            .filter(|term| seen.insert(*term))
            .collect()
    }
}

/// Splits a query string into lower-cased terms.
///
/// Splits on runs of whitespace and drops empty tokens. Order is preserved and
/// duplicates are kept.
pub fn tokenize(input: &str) -> Vec<String> {
    input
        .split_whitespace()
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input() {
        assert!(tokenize("").is_empty());
        assert!(Query::parse("").is_none());
    }

    #[test]
    fn whitespace_only() {
        assert!(tokenize(" \t\n ").is_empty());
        assert!(Query::parse("   ").is_none());
    }

    #[test]
    fn surrounding_whitespace_and_case() {
        assert_eq!(tokenize("  Cat Dog "), vec!["cat", "dog"]);
    }

    #[test]
    fn whitespace_runs() {
        assert_eq!(
            tokenize("rust\t\tasync \n tokio"),
            vec!["rust", "async", "tokio"]
        );
    }

    #[test]
    fn duplicates_preserved() {
        let query = Query::parse("cat Dog CAT").unwrap();
        assert_eq!(query.terms(), ["cat", "dog", "cat"]);
        assert_eq!(query.distinct_terms(), vec!["cat", "dog"]);
    }

    #[test]
    fn raw_and_normalized() {
        let query = Query::parse("Widget GADGET").unwrap();
        assert_eq!(query.raw(), "Widget GADGET");
        assert_eq!(query.normalized(), "widget gadget");
    }

    #[test]
    fn punctuation_is_kept() {
        assert_eq!(tokenize("c++ /usr/bin"), vec!["c++", "/usr/bin"]);
    }

    #[test]
    fn absent_parameter_is_no_query() {
        assert!(Query::from_param(None).is_none());
        assert!(Query::from_param(Some("")).is_none());
        assert_eq!(
            Query::from_param(Some("Rust")).unwrap().terms(),
            ["rust"]
        );
    }

    #[test]
    fn unicode_lowercasing() {
        assert_eq!(tokenize("ÄPFEL Straße"), vec!["äpfel", "straße"]);
    }
}
