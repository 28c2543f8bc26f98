//! Search backends and result pipeline for sift.
//!
//! This crate answers keyword searches:
//! - [`SearchBackend`] implementations fetch matching documents and relevance
//!   signals from SQLite keyword-ranking tables or a Solr core
//! - [`aggregate`] folds signals into one rank per document
//! - [`page_links`] builds the page navigation
//! - [`assemble`] produces highlighted URL, title and snippet per result
//! - [`SearchEngine`] runs the whole pipeline for one request
//!
//! # Example
//!
//! ```no_run
//! use sift_config::SearchSettings;
//! use sift_index::{SearchEngine, SearchOutcome, SearchRequest, SqliteBackend};
//!
//! let engine = SearchEngine::new(SqliteBackend::new("search.db"), &SearchSettings::default());
//! match engine.search(&SearchRequest::new("rust parser", 1)).unwrap() {
//!     SearchOutcome::Results(page) => println!("{} results", page.total),
//!     SearchOutcome::NoQuery => {}
//! }
//! ```

#![warn(missing_docs)]

mod assemble;
mod backend;
mod document;
mod engine;
mod error;
mod paginate;
mod rank;

pub use assemble::{AssembledResult, assemble, snippet};
pub use backend::{
    Coverage, Retrieval, SCHEMA, SearchBackend, Signal, SolrBackend, SqliteBackend, Window,
    open_backend,
};
pub use document::Document;
pub use engine::{ResultPage, SearchEngine, SearchOutcome, SearchRequest, parse_page};
pub use error::{BackendError, SearchError};
pub use paginate::{LinkKind, PageLink, max_pages, page_links};
pub use rank::{ScoredResult, aggregate};
