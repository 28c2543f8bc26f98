//! Result assembly: URL, title and snippet for each ranked document.

use sift_highlight::{Highlighted, TermHighlighter};

use crate::{Document, rank::ScoredResult};

/// Appended to snippets cut from body text.
const ELLIPSIS: &str = "...";

/// A result ready for rendering. Every text field carries its match spans.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledResult {
    /// Absolute page URL.
    pub url: Highlighted,
    /// Page title.
    pub title: Highlighted,
    /// Description, or the start of the body when there is no description.
    pub snippet: Highlighted,
    /// Aggregated rank.
    pub rank: f64,
}

/// Chooses the snippet text for a document.
///
/// A non-blank description wins. Otherwise the body is cut to `max_chars`
/// characters with `...` appended when anything was cut. No body means an empty
/// snippet.
pub fn snippet(document: &Document, max_chars: usize) -> String {
    let description = document.description.trim();
    if !description.is_empty() {
        return description.to_string();
    }

    let Some(body) = document.body.as_deref().map(str::trim) else {
        return String::new();
    };
    match body.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &body[..cut]),
        None => body.to_string(),
    }
}

/// Assembles the results of one page, highlighting each text field independently.
pub fn assemble(
    results: &[ScoredResult],
    highlighter: &TermHighlighter,
    snippet_length: usize,
) -> Vec<AssembledResult> {
    results
        .iter()
        .map(|result| {
            let document = &result.document;
            AssembledResult {
                url: highlighter.highlight(&document.url()),
                title: highlighter.highlight(&document.title),
                snippet: highlighter.highlight(&snippet(document, snippet_length)),
                rank: result.rank,
            }
        })
        .collect()
}
