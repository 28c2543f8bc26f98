//! Search orchestration.
//!
//! Runs one request through the pipeline: tokenize, retrieve, rank, page, then
//! highlight and assemble only the results on the requested page.

use std::time::Duration;

use sift_config::SearchSettings;
use sift_highlight::TermHighlighter;
use sift_query::Query;

use crate::{
    SearchError,
    assemble::{AssembledResult, assemble},
    backend::{Coverage, Retrieval, SearchBackend, Window},
    paginate::{PageLink, max_pages, page_links},
    rank::{ScoredResult, aggregate},
};

/// Parses a page parameter. Missing, malformed and zero values mean page 1.
pub fn parse_page(raw: Option<&str>) -> usize {
    raw.and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|&page| page > 0)
        .unwrap_or(1)
}

/// One search request as received from a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Raw query text. `None` means no search was asked for.
    pub query: Option<String>,
    /// Requested page, 1-based.
    pub page: usize,
}

impl SearchRequest {
    /// Creates a request for `page` of `query`.
    pub fn new(query: impl Into<String>, page: usize) -> Self {
        Self {
            query: Some(query.into()),
            page,
        }
    }

    /// Creates a request from raw `q` and `page` parameters.
    pub fn from_params(query: Option<&str>, page: Option<&str>) -> Self {
        Self {
            query: query.map(String::from),
            page: parse_page(page),
        }
    }
}

/// The outcome of a search that did not fail.
#[derive(Debug, Clone)]
pub enum SearchOutcome {
    /// The query held no terms; nothing was searched.
    NoQuery,
    /// One page of results.
    Results(ResultPage),
}

/// One page of search results.
#[derive(Debug, Clone)]
pub struct ResultPage {
    /// The tokenized query.
    pub query: Query,
    /// Backend that answered.
    pub backend: &'static str,
    /// Number of matching documents across all pages.
    pub total: usize,
    /// Current page, 1-based.
    pub page: usize,
    /// Results per page.
    pub page_size: usize,
    /// Number of pages.
    pub max_pages: usize,
    /// Results on this page, best first.
    pub results: Vec<AssembledResult>,
    /// Page navigation.
    pub links: Vec<PageLink>,
    /// Query time reported by the backend.
    pub elapsed: Option<Duration>,
}

/// Answers search requests against one backend.
#[derive(Debug)]
pub struct SearchEngine<B> {
    /// Document source.
    backend: B,
    /// Results per page.
    page_size: usize,
    /// Character budget for body snippets.
    snippet_length: usize,
}

impl<B: SearchBackend> SearchEngine<B> {
    /// Creates an engine using the page size and snippet length from `settings`.
    pub fn new(backend: B, settings: &SearchSettings) -> Self {
        Self {
            backend,
            page_size: settings.page_size.max(1),
            snippet_length: settings.snippet_length,
        }
    }

    /// Returns the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Runs a search.
    ///
    /// A query without terms returns [`SearchOutcome::NoQuery`] without touching the
    /// backend. Backend failures surface as [`SearchError::Unavailable`], never as an
    /// empty page.
    pub fn search(&self, request: &SearchRequest) -> Result<SearchOutcome, SearchError> {
        let Some(query) = Query::from_param(request.query.as_deref()) else {
            tracing::debug!("no query terms; skipping search");
            return Ok(SearchOutcome::NoQuery);
        };

        let page = request.page.max(1);
        let window = Window::for_page(page, self.page_size);
        let span = tracing::info_span!(
            "search",
            backend = self.backend.name(),
            terms = query.terms().len(),
            page
        );
        let _entered = span.enter();

        let retrieval = self.backend.retrieve(&query, window)?;
        let (total, on_page, elapsed) = Self::window_results(retrieval, window)?;

        let highlighter = TermHighlighter::new(&query.distinct_terms()).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "highlighting disabled for this query");
            TermHighlighter::none()
        });
        let results = assemble(&on_page, &highlighter, self.snippet_length);
        let links = page_links(total, self.page_size, page);

        tracing::info!(
            total,
            returned = results.len(),
            elapsed_ms = elapsed.map(|d| d.as_secs_f64() * 1000.0),
            "search complete"
        );

        Ok(SearchOutcome::Results(ResultPage {
            query,
            backend: self.backend.name(),
            total,
            page,
            page_size: self.page_size,
            max_pages: max_pages(total, self.page_size),
            results,
            links,
            elapsed,
        }))
    }

    /// Ranks a retrieval and cuts out the requested window.
    ///
    /// Complete retrievals are ranked in full and sliced here, so the total always
    /// matches the rows. Windowed retrievals are checked against their total.
    fn window_results(
        retrieval: Retrieval,
        window: Window,
    ) -> Result<(usize, Vec<ScoredResult>, Option<Duration>), SearchError> {
        let Retrieval {
            documents,
            signals,
            coverage,
        } = retrieval;

        match coverage {
            Coverage::Complete => {
                let ranked = aggregate(documents, &signals);
                let total = ranked.len();
                let on_page = ranked
                    .into_iter()
                    .skip(window.offset)
                    .take(window.limit)
                    .collect();
                Ok((total, on_page, None))
            }
            Coverage::Windowed { total, elapsed } => {
                let returned = documents.len();
                if returned > window.limit {
                    return Err(SearchError::Invariant(format!(
                        "backend returned {returned} results for a page of {}",
                        window.limit
                    )));
                }
                if returned > 0 && window.offset.saturating_add(returned) > total {
                    return Err(SearchError::Invariant(format!(
                        "backend returned results {}..{} of a total of {total}",
                        window.offset,
                        window.offset.saturating_add(returned)
                    )));
                }
                Ok((total, aggregate(documents, &signals), elapsed))
            }
        }
    }
}
