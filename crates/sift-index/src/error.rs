//! Error types for the sift-index crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by a search backend.
///
/// Any of these means the search could not be answered; callers must not present
/// them as "no results".
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend is selected but its connection settings are missing.
    #[error("{backend} backend is not configured: {message}")]
    NotConfigured {
        /// Backend name.
        backend: &'static str,
        /// Which setting is missing.
        message: String,
    },

    /// Failed to open the SQLite database.
    #[error("failed to open database {path}: {source}")]
    Open {
        /// Database path.
        path: PathBuf,
        /// Underlying SQLite error.
        source: rusqlite::Error,
    },

    /// A SQL statement failed.
    #[error("database query failed: {0}")]
    Query(#[from] rusqlite::Error),

    /// The HTTP request to Solr failed (connection, timeout or body decoding).
    #[error("solr request to {url} failed: {source}")]
    Http {
        /// Request URL.
        url: String,
        /// Underlying HTTP client error.
        source: reqwest::Error,
    },

    /// Solr answered with a non-success status.
    #[error("solr returned HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Error message from the response, if any.
        message: String,
    },

    /// Solr answered with a body that is not a search response.
    #[error("unexpected solr response: {0}")]
    UnexpectedResponse(String),

    /// A returned document lacks a required field.
    #[error("document {id} is missing required field '{field}'")]
    MalformedDocument {
        /// Document identifier, or `?` when the identifier itself is missing.
        id: String,
        /// Configured name of the missing field.
        field: String,
    },
}

impl BackendError {
    /// Creates an `Http` error for a request to `url`.
    pub(crate) fn http(url: &str, source: reqwest::Error) -> Self {
        Self::Http {
            url: url.to_string(),
            source,
        }
    }
}

/// Errors returned by [`crate::SearchEngine::search`].
#[derive(Debug, Error)]
pub enum SearchError {
    /// The backend could not answer.
    #[error("search unavailable: {0}")]
    Unavailable(#[from] BackendError),

    /// The backend returned data inconsistent with itself.
    #[error("inconsistent search result: {0}")]
    Invariant(String),
}
