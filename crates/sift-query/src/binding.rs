//! Term bindings.
//!
//! Query terms never reach a backend query as literal text. Each term occurrence is
//! given a synthetic placeholder and the value travels alongside the query.

use crate::Query;

/// Prefix for placeholder names.
const PLACEHOLDER_PREFIX: &str = "term_";

/// A single placeholder-to-term binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermBinding {
    /// Placeholder including the leading `:` (e.g. `:term_0`).
    placeholder: String,
    /// The literal term value.
    value: String,
}

impl TermBinding {
    /// Creates the binding for the term at `index`.
    fn new(index: usize, value: &str) -> Self {
        Self {
            placeholder: format!(":{PLACEHOLDER_PREFIX}{index}"),
            value: value.to_string(),
        }
    }

    /// Returns the placeholder as written in a statement (`:term_0`).
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Returns the placeholder name without the leading `:` (`term_0`).
    pub fn name(&self) -> &str {
        &self.placeholder[1..]
    }

    /// Returns the bound term.
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Binds every term occurrence of `query`, in term order.
///
/// Duplicate terms get distinct placeholders, so keys never collide.
pub fn bind_terms(query: &Query) -> Vec<TermBinding> {
    query
        .terms()
        .iter()
        .enumerate()
        .map(|(index, term)| TermBinding::new(index, term))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn one_binding_per_occurrence() {
        let query = Query::parse("cat dog cat").unwrap();
        let bindings = bind_terms(&query);

        assert_eq!(bindings.len(), 3);
        assert_eq!(bindings[0].placeholder(), ":term_0");
        assert_eq!(bindings[0].name(), "term_0");
        assert_eq!(bindings[2].value(), "cat");

        let names: HashSet<_> = bindings.iter().map(TermBinding::name).collect();
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn stable_for_identical_input() {
        let a = bind_terms(&Query::parse("widget gadget").unwrap());
        let b = bind_terms(&Query::parse("widget gadget").unwrap());
        assert_eq!(a, b);
    }
}
