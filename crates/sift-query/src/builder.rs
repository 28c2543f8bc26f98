//! Backend query composition.
//!
//! Both shapes match documents containing *any* of the query terms. Terms are
//! combined with OR semantics; a document needs only one of them to be retrieved.

use crate::{
    Query,
    binding::{TermBinding, bind_terms},
};

/// A boosted document field and its relevance multiplier.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldBoost {
    /// Field name in the search index.
    pub field: String,
    /// Relevance multiplier applied to matches in this field.
    pub weight: f32,
}

impl FieldBoost {
    /// Creates a field boost.
    pub fn new(field: impl Into<String>, weight: f32) -> Self {
        Self {
            field: field.into(),
            weight,
        }
    }
}

/// Default field boosts for free-text queries.
pub fn default_boosts() -> Vec<FieldBoost> {
    vec![
        FieldBoost::new("url", 15.0),
        FieldBoost::new("meta_keywords", 10.0),
        FieldBoost::new("title", 5.0),
        FieldBoost::new("meta_description", 4.0),
        FieldBoost::new("content", 2.0),
    ]
}

/// Exact-match lookup against a keyword column, matching any query term.
///
/// Renders as `<column> IN (:term_0, :term_1, ...)` with the values carried in
/// [`KeywordLookup::bindings`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordLookup {
    /// SQL predicate containing only placeholders.
    predicate: String,
    /// Values for the placeholders, in term order.
    bindings: Vec<TermBinding>,
}

impl KeywordLookup {
    /// Builds an any-term predicate over `column`.
    pub fn any_term(column: &str, query: &Query) -> Self {
        let bindings = bind_terms(query);
        let placeholders = bindings
            .iter()
            .map(TermBinding::placeholder)
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            predicate: format!("{column} IN ({placeholders})"),
            bindings,
        }
    }

    /// Returns the SQL predicate.
    pub fn predicate(&self) -> &str {
        &self.predicate
    }

    /// Returns the term bindings.
    pub fn bindings(&self) -> &[TermBinding] {
        &self.bindings
    }
}

/// Free-text query over boosted fields, matching any query term.
#[derive(Debug, Clone, PartialEq)]
pub struct BoostedQuery {
    /// Escaped query text (terms joined by spaces).
    text: String,
    /// Boosted query fields (`url^15 title^5 ...`).
    fields: String,
    /// Term bindings, in term order.
    bindings: Vec<TermBinding>,
}

impl BoostedQuery {
    /// Builds a boosted any-term query.
    ///
    /// Each term is escaped for Lucene query syntax before it is placed in the text.
    pub fn any_term(query: &Query, boosts: &[FieldBoost]) -> Self {
        let bindings = bind_terms(query);
        let text = bindings
            .iter()
            .map(|binding| escape_term(binding.value()))
            .collect::<Vec<_>>()
            .join(" ");

        Self {
            text,
            fields: query_fields(boosts),
            bindings,
        }
    }

    /// Returns the escaped query text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the boosted query fields.
    pub fn fields(&self) -> &str {
        &self.fields
    }

    /// Returns the term bindings.
    pub fn bindings(&self) -> &[TermBinding] {
        &self.bindings
    }

    /// Operator joining the terms. Always OR: any term may match.
    pub fn operator(&self) -> &'static str {
        "OR"
    }
}

/// Renders field boosts as a `qf` value, preserving configured order.
fn query_fields(boosts: &[FieldBoost]) -> String {
    boosts
        .iter()
        .map(|boost| format!("{}^{}", boost.field, boost.weight))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Escapes characters with special meaning in Lucene query syntax.
pub fn escape_term(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(
            ch,
            '+' | '-'
                | '&'
                | '|'
                | '!'
                | '('
                | ')'
                | '{'
                | '}'
                | '['
                | ']'
                | '^'
                | '"'
                | '~'
                | '*'
                | '?'
                | ':'
                | '\\'
                | '/'
        ) || ch.is_whitespace()
        {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
