//! Query tokenizing and backend query composition for sift.
//!
//! A raw query string is lower-cased and split into terms, then turned into one of
//! two backend query shapes:
//!
//! - **Keyword lookup**: an exact-match `IN (...)` predicate over a keyword column,
//!   with every term carried as a named binding.
//! - **Boosted query**: a free-text query whose matches in different document fields
//!   carry different weights.
//!
//! Both shapes match documents containing *any* of the terms.
//!
//! # Example
//!
//! ```
//! use sift_query::{KeywordLookup, Query};
//!
//! let query = Query::parse("Widget gadget").unwrap();
//! let lookup = KeywordLookup::any_term("KW.keyword", &query);
//! assert_eq!(lookup.predicate(), "KW.keyword IN (:term_0, :term_1)");
//! ```

#![warn(missing_docs)]

mod binding;
mod builder;
mod tokenize;

pub use binding::{TermBinding, bind_terms};
pub use builder::{BoostedQuery, FieldBoost, KeywordLookup, default_boosts, escape_term};
pub use tokenize::{Query, tokenize};
