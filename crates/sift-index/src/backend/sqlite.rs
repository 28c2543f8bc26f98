//! Relational backend over SQLite keyword-ranking tables.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags, ToSql};
use sift_query::{KeywordLookup, Query};

use super::{Coverage, Retrieval, SearchBackend, Signal, Window};
use crate::{BackendError, Document};

/// Tables read by [`SqliteBackend`].
///
/// The crawler side of the system writes these; sift only reads them. Exposed for
/// fixtures and `sift schema`.
pub const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS domains (
    domain_id INTEGER PRIMARY KEY,
    is_https INTEGER NOT NULL DEFAULT 0,
    domain_name TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS paths (
    path_id INTEGER PRIMARY KEY,
    domain_id INTEGER NOT NULL REFERENCES domains(domain_id),
    path TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS keywords (
    keyword_id INTEGER PRIMARY KEY,
    keyword TEXT NOT NULL UNIQUE
);
CREATE TABLE IF NOT EXISTS keyword_ranking (
    keyword_id INTEGER NOT NULL REFERENCES keywords(keyword_id),
    path_id INTEGER NOT NULL REFERENCES paths(path_id),
    rank REAL NOT NULL
);
CREATE TABLE IF NOT EXISTS page_details (
    path_id INTEGER PRIMARY KEY REFERENCES paths(path_id),
    title TEXT,
    description TEXT
);
";

/// Reads keyword rankings from a SQLite database.
///
/// Each retrieval opens a fresh read-only connection and returns every positive
/// (page, keyword) ranking row for the query terms. The result is always
/// [`Coverage::Complete`], so the total and the page are computed from the same
/// rows.
#[derive(Debug, Clone)]
pub struct SqliteBackend {
    /// Database file.
    path: PathBuf,
}

impl SqliteBackend {
    /// Creates a backend reading from `path`. The file is opened per retrieval.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the database path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens a read-only connection.
    fn connect(&self) -> Result<Connection, BackendError> {
        Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|source| BackendError::Open {
            path: self.path.clone(),
            source,
        })
    }

    /// Runs the ranking statement, one signal per (page, keyword) row.
    ///
    /// Rows arrive ordered by page, so each page's document is read once, from its
    /// first row; later rows of the same page only contribute a signal.
    fn ranking_rows(
        conn: &Connection,
        lookup: &KeywordLookup,
    ) -> Result<(Vec<Document>, Vec<Signal>), BackendError> {
        let sql = format!(
            "SELECT
                PATHS.path_id,
                KW.keyword,
                RANKING.rank,
                COALESCE(DOMAINS.is_https, 0),
                COALESCE(DOMAINS.domain_name, ''),
                PATHS.path,
                DETAILS.title,
                DETAILS.description
            FROM paths AS PATHS
            JOIN keyword_ranking AS RANKING ON RANKING.path_id = PATHS.path_id
            JOIN keywords AS KW ON KW.keyword_id = RANKING.keyword_id
            LEFT JOIN page_details AS DETAILS ON DETAILS.path_id = PATHS.path_id
            LEFT JOIN domains AS DOMAINS ON DOMAINS.domain_id = PATHS.domain_id
            WHERE {} AND RANKING.rank > 0
            ORDER BY PATHS.path_id, KW.keyword",
            lookup.predicate()
        );

        let values: Vec<&str> = lookup.bindings().iter().map(|b| b.value()).collect();
        let params: Vec<(&str, &dyn ToSql)> = lookup
            .bindings()
            .iter()
            .zip(&values)
            .map(|(binding, value)| (binding.placeholder(), value as &dyn ToSql))
            .collect();

        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query(params.as_slice())?;

        let mut documents = Vec::new();
        let mut signals = Vec::new();
        let mut current: Option<i64> = None;

        while let Some(row) = rows.next()? {
            let path_id: i64 = row.get(0)?;
            if current != Some(path_id) {
                documents.push(Document {
                    id: path_id.to_string(),
                    secure: row.get(3)?,
                    host: row.get(4)?,
                    path: row.get(5)?,
                    title: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
                    description: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
                    body: None,
                });
                current = Some(path_id);
            }
            signals.push(Signal {
                document: documents.len() - 1,
                term: Some(row.get(1)?),
                rank: row.get(2)?,
            });
        }

        Ok((documents, signals))
    }
}

impl SearchBackend for SqliteBackend {
    fn name(&self) -> &'static str {
        "relational"
    }

    fn retrieve(&self, query: &Query, _window: Window) -> Result<Retrieval, BackendError> {
        let conn = self.connect()?;
        let lookup = KeywordLookup::any_term("KW.keyword", query);
        let (documents, signals) = Self::ranking_rows(&conn, &lookup)?;

        tracing::debug!(
            database = %self.path.display(),
            rows = signals.len(),
            documents = documents.len(),
            "relational retrieval"
        );

        Ok(Retrieval {
            documents,
            signals,
            coverage: Coverage::Complete,
        })
    }
}
