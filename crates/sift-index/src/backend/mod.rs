//! Search backends.
//!
//! A backend turns a tokenized [`Query`] into documents plus per-document relevance
//! signals. Two backends exist:
//!
//! - [`SqliteBackend`] reads keyword-ranking tables and returns every matching
//!   (page, keyword) row, leaving grouping and paging to the engine.
//! - [`SolrBackend`] sends a boosted free-text query to a Solr core, which ranks and
//!   pages on its side.

mod solr;
mod sqlite;

use std::time::Duration;

use sift_config::{BackendKind, Config};
use sift_query::Query;
pub use solr::SolrBackend;
pub use sqlite::{SCHEMA, SqliteBackend};

use crate::{BackendError, Document};

/// Result window requested from a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Number of ranked results to skip.
    pub offset: usize,
    /// Maximum number of results to return.
    pub limit: usize,
}

impl Window {
    /// Computes the window for a 1-based page.
    ///
    /// Page 0 is treated as page 1. Saturates instead of overflowing.
    pub fn for_page(page: usize, page_size: usize) -> Self {
        Self {
            offset: page.saturating_sub(1).saturating_mul(page_size),
            limit: page_size,
        }
    }

    /// Returns the exclusive end of the window.
    pub fn end(&self) -> usize {
        self.offset.saturating_add(self.limit)
    }
}

/// One relevance contribution for one document.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    /// Index into [`Retrieval::documents`].
    pub document: usize,
    /// The keyword that produced the signal, when the backend reports it.
    pub term: Option<String>,
    /// Contribution to the document's rank.
    pub rank: f64,
}

/// How much of the matching set a retrieval covers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coverage {
    /// Every matching document; the engine ranks and pages locally.
    Complete,
    /// Only the requested window, already ranked by the backend.
    Windowed {
        /// Total number of matching documents.
        total: usize,
        /// Query time reported by the backend.
        elapsed: Option<Duration>,
    },
}

/// Documents and signals returned by a backend.
#[derive(Debug, Clone)]
pub struct Retrieval {
    /// Documents in retrieval order.
    pub documents: Vec<Document>,
    /// Relevance signals referencing `documents` by index.
    pub signals: Vec<Signal>,
    /// Whether the retrieval is the complete set or a window.
    pub coverage: Coverage,
}

/// A source of ranked documents.
pub trait SearchBackend: Send + Sync {
    /// Short name used in logs and messages.
    fn name(&self) -> &'static str;

    /// Retrieves documents matching any term of `query`.
    ///
    /// Backends returning [`Coverage::Windowed`] must honor `window`; backends
    /// returning [`Coverage::Complete`] may ignore it.
    fn retrieve(&self, query: &Query, window: Window) -> Result<Retrieval, BackendError>;
}

impl<B: SearchBackend + ?Sized> SearchBackend for Box<B> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn retrieve(&self, query: &Query, window: Window) -> Result<Retrieval, BackendError> {
        (**self).retrieve(query, window)
    }
}

/// Builds the backend of the given kind from configuration.
pub fn open_backend(
    config: &Config,
    kind: BackendKind,
) -> Result<Box<dyn SearchBackend>, BackendError> {
    match kind {
        BackendKind::Relational => {
            let path = config
                .relational
                .database
                .clone()
                .ok_or_else(|| BackendError::NotConfigured {
                    backend: "relational",
                    message: "set [relational] database".to_string(),
                })?;
            Ok(Box::new(SqliteBackend::new(path)))
        }
        BackendKind::Solr => Ok(Box::new(SolrBackend::from_settings(&config.solr)?)),
    }
}
