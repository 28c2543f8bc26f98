//! Rendering and JSON serialization for search results.

use serde::Serialize;
use sift_highlight::{dim, header, link, subheader, terminal};
use sift_index::{LinkKind, PageLink, ResultPage};

/// JSON form of one result.
#[derive(Debug, Serialize)]
pub struct JsonResult {
    /// Page URL with highlight markers.
    pub url: String,
    /// Title with highlight markers.
    pub title: String,
    /// Snippet with highlight markers.
    pub snippet: String,
    /// Aggregated rank.
    pub rank: f64,
}

/// JSON form of a result page, shared by `search --json` and `serve`.
#[derive(Debug, Serialize)]
pub struct JsonSearchOutput {
    /// The query as received.
    pub query: String,
    /// Distinct query terms.
    pub terms: Vec<String>,
    /// Backend that answered.
    pub backend: &'static str,
    /// Number of matching pages across all result pages.
    pub total: usize,
    /// Current page, 1-based.
    pub page: usize,
    /// Results per page.
    pub page_size: usize,
    /// Number of result pages.
    pub max_pages: usize,
    /// Backend query time in milliseconds, when reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_ms: Option<f64>,
    /// Results on this page.
    pub results: Vec<JsonResult>,
    /// Page navigation.
    pub links: Vec<PageLink>,
}

impl JsonSearchOutput {
    /// Builds the JSON form, wrapping matches in `open`/`close`.
    pub fn new(page: &ResultPage, open: &str, close: &str) -> Self {
        Self {
            query: page.query.raw().to_string(),
            terms: page
                .query
                .distinct_terms()
                .into_iter()
                .map(String::from)
                .collect(),
            backend: page.backend,
            total: page.total,
            page: page.page,
            page_size: page.page_size,
            max_pages: page.max_pages,
            elapsed_ms: page.elapsed.map(|d| d.as_secs_f64() * 1000.0),
            results: page
                .results
                .iter()
                .map(|r| JsonResult {
                    url: r.url.render(open, close),
                    title: r.title.render(open, close),
                    snippet: r.snippet.render(open, close),
                    rank: r.rank,
                })
                .collect(),
            links: page.links.clone(),
        }
    }
}

/// Returns `Found N result` with the plural `s` when `N != 1`.
pub fn found_phrase(total: usize) -> String {
    let plural = if total == 1 { "" } else { "s" };
    format!("Found {total} result{plural}")
}

/// Renders the page navigation as one line, e.g. `« 1 2 [3] 4 »`.
pub fn format_links(links: &[PageLink]) -> String {
    links
        .iter()
        .map(|l| match l.kind {
            LinkKind::Back => "«".to_string(),
            LinkKind::Page => l.page.to_string(),
            LinkKind::Current => format!("[{}]", l.page),
            LinkKind::Next => "»".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Formats a result page for the terminal.
pub fn format_page(page: &ResultPage) -> String {
    let mut out = String::new();

    let mut summary = found_phrase(page.total);
    if let Some(elapsed) = page.elapsed {
        summary.push_str(&format!(" ({} ms)", elapsed.as_millis()));
    }
    out.push_str(&header(&summary));
    out.push('\n');

    if page.results.is_empty() {
        out.push('\n');
        if page.total == 0 {
            out.push_str(&dim("No pages matched your search."));
        } else {
            out.push_str(&dim(&format!(
                "Page {} is past the last page ({}).",
                page.page, page.max_pages
            )));
        }
        out.push('\n');
    }

    for result in &page.results {
        out.push('\n');
        let title = if result.title.text.is_empty() {
            dim("(untitled)")
        } else {
            subheader(&terminal(&result.title))
        };
        out.push_str(&title);
        out.push('\n');
        out.push_str(&link(&terminal(&result.url)));
        out.push('\n');
        if !result.snippet.text.is_empty() {
            out.push_str(&terminal(&result.snippet));
            out.push('\n');
        }
        out.push_str(&dim(&format!("rank {}", result.rank)));
        out.push('\n');
    }

    if page.links.len() > 1 {
        out.push('\n');
        out.push_str(&format_links(&page.links));
        out.push_str("  ");
        out.push_str(&dim(&format!("page {} of {}", page.page, page.max_pages)));
        out.push('\n');
    }

    out
}
