//! Ranking aggregation.
//!
//! Folds per-term signals into one rank per document and orders documents by it.

use std::{cmp::Ordering, collections::HashMap};

use crate::{Document, backend::Signal};

/// A document with its aggregated rank.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredResult {
    /// The ranked document.
    pub document: Document,
    /// Sum of the document's signals.
    pub rank: f64,
}

/// Aggregates signals into ranked documents.
///
/// Signals are grouped by document and summed. Documents without signals, or whose
/// summed rank is not positive, are dropped. The rest are sorted by descending rank;
/// the sort is stable, so equal ranks keep retrieval order.
///
/// Signals pointing past the end of `documents` are ignored.
pub fn aggregate(documents: Vec<Document>, signals: &[Signal]) -> Vec<ScoredResult> {
    let mut sums: HashMap<usize, f64> = HashMap::new();
    for signal in signals {
        if signal.document < documents.len() {
            *sums.entry(signal.document).or_insert(0.0) += signal.rank;
        }
    }

    let mut ranked: Vec<ScoredResult> = documents
        .into_iter()
        .enumerate()
        .filter_map(|(index, document)| {
            let rank = *sums.get(&index)?;
            (rank > 0.0).then_some(ScoredResult { document, rank })
        })
        .collect();

    ranked.sort_by(|a, b| b.rank.partial_cmp(&a.rank).unwrap_or(Ordering::Equal));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str) -> Document {
        Document {
            id: id.to_string(),
            secure: false,
            host: "example.com".to_string(),
            path: format!("/{id}"),
            title: id.to_string(),
            description: String::new(),
            body: None,
        }
    }

    fn signal(document: usize, term: &str, rank: f64) -> Signal {
        Signal {
            document,
            term: Some(term.to_string()),
            rank,
        }
    }

    fn ids(results: &[ScoredResult]) -> Vec<&str> {
        results.iter().map(|r| r.document.id.as_str()).collect()
    }

    #[test]
    fn sums_signals_per_document() {
        let results = aggregate(
            vec![doc("1"), doc("2")],
            &[signal(0, "cat", 3.0), signal(0, "dog", 2.0), signal(1, "dog", 4.0)],
        );
        assert_eq!(ids(&results), ["1", "2"]);
        assert_eq!(results[0].rank, 5.0);
        assert_eq!(results[1].rank, 4.0);
    }

    #[test]
    fn drops_unsignalled_and_non_positive() {
        let results = aggregate(
            vec![doc("a"), doc("b"), doc("c"), doc("d")],
            &[signal(1, "x", 0.0), signal(2, "x", 2.0), signal(3, "x", -1.0), signal(3, "y", 0.5)],
        );
        assert_eq!(ids(&results), ["c"]);
    }

    #[test]
    fn ties_keep_retrieval_order() {
        let results = aggregate(
            vec![doc("x"), doc("y"), doc("z")],
            &[signal(2, "t", 1.0), signal(0, "t", 1.0), signal(1, "t", 3.0)],
        );
        assert_eq!(ids(&results), ["y", "x", "z"]);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let documents = vec![doc("1"), doc("2"), doc("3")];
        let signals = [signal(0, "a", 1.0), signal(1, "a", 2.0), signal(2, "b", 2.0)];
        assert_eq!(
            aggregate(documents.clone(), &signals),
            aggregate(documents, &signals)
        );
    }

    #[test]
    fn out_of_range_signals_are_ignored() {
        let results = aggregate(vec![doc("1")], &[signal(5, "a", 9.0), signal(0, "a", 1.0)]);
        assert_eq!(ids(&results), ["1"]);
        assert_eq!(results[0].rank, 1.0);
    }

    #[test]
    fn empty_input() {
        assert!(aggregate(Vec::new(), &[]).is_empty());
    }
}
