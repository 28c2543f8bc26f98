//! Page windows and page links.

use serde::Serialize;

/// Number of pages linked on each side of the current page before the window
/// jumps to the first or last page.
const SPREAD: usize = 5;

/// Kind of a page link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// Link to the previous page.
    Back,
    /// Link to a numbered page.
    Page,
    /// The page being shown.
    Current,
    /// Link to the following page.
    Next,
}

/// One entry of the page navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageLink {
    /// What the link is.
    pub kind: LinkKind,
    /// Target page, 1-based.
    pub page: usize,
}

impl PageLink {
    /// Creates a link.
    fn new(kind: LinkKind, page: usize) -> Self {
        Self { kind, page }
    }
}

/// Returns `ceil(total / page_size)`, or 0 when `page_size` is 0.
pub fn max_pages(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Computes the page navigation for `page` of a result set.
///
/// Layout, in order:
/// - `Back` to the previous page, when past page 1
/// - the backward window: every earlier page when `page <= 5`, otherwise page 1
///   followed by the five pages before `page`
/// - `Current`, when `page` exists
/// - the forward window: pages after `page` up to (not including) the last page when
///   fewer than five remain, otherwise the next four pages followed by the last page
/// - `Next`, when a later page exists
///
/// Requests past the last page get no current, forward or next links, and their
/// backward links are clamped to existing pages. An empty result set has no links.
pub fn page_links(total: usize, page_size: usize, page: usize) -> Vec<PageLink> {
    let last = max_pages(total, page_size);
    if last == 0 {
        return Vec::new();
    }
    let page = page.max(1);
    let mut links = Vec::new();

    if page > 1 {
        links.push(PageLink::new(LinkKind::Back, (page - 1).min(last)));
    }

    let backward_start = if page <= SPREAD {
        1
    } else {
        links.push(PageLink::new(LinkKind::Page, 1));
        (page - SPREAD).max(2)
    };
    for target in backward_start..page {
        if target > last {
            break;
        }
        links.push(PageLink::new(LinkKind::Page, target));
    }

    if page > last {
        return links;
    }
    links.push(PageLink::new(LinkKind::Current, page));

    if last - page < SPREAD {
        links.extend((page + 1..last).map(|target| PageLink::new(LinkKind::Page, target)));
    } else {
        links.extend((page + 1..page + SPREAD).map(|target| PageLink::new(LinkKind::Page, target)));
        links.push(PageLink::new(LinkKind::Page, last));
    }

    if last > page {
        links.push(PageLink::new(LinkKind::Next, page + 1));
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use LinkKind::{Back, Current, Next, Page};

    fn render(links: &[PageLink]) -> String {
        links
            .iter()
            .map(|l| match l.kind {
                Back => format!("<{}", l.page),
                Page => l.page.to_string(),
                Current => format!("[{}]", l.page),
                Next => format!("{}>", l.page),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn max_pages_rounds_up() {
        assert_eq!(max_pages(0, 20), 0);
        assert_eq!(max_pages(1, 20), 1);
        assert_eq!(max_pages(20, 20), 1);
        assert_eq!(max_pages(21, 20), 2);
        assert_eq!(max_pages(45, 20), 3);
        assert_eq!(max_pages(10, 0), 0);
    }

    #[test]
    fn no_results_no_links() {
        assert!(page_links(0, 20, 1).is_empty());
        assert!(page_links(0, 20, 7).is_empty());
    }

    #[test]
    fn single_page() {
        assert_eq!(render(&page_links(5, 20, 1)), "[1]");
    }

    #[test]
    fn first_of_three() {
        assert_eq!(render(&page_links(45, 20, 1)), "[1] 2 2>");
    }

    #[test]
    fn last_of_three() {
        assert_eq!(render(&page_links(45, 20, 3)), "<2 1 2 [3]");
    }

    #[test]
    fn far_from_both_ends() {
        // 30 pages, page 15.
        assert_eq!(
            render(&page_links(600, 20, 15)),
            "<14 1 10 11 12 13 14 [15] 16 17 18 19 30 16>"
        );
    }

    #[test]
    fn backward_window_merges_with_first_page() {
        assert_eq!(
            render(&page_links(600, 20, 6)),
            "<5 1 2 3 4 5 [6] 7 8 9 10 30 7>"
        );
        assert_eq!(
            render(&page_links(600, 20, 5)),
            "<4 1 2 3 4 [5] 6 7 8 9 30 6>"
        );
    }

    #[test]
    fn forward_window_near_end() {
        assert_eq!(render(&page_links(200, 20, 6)), "<5 1 2 3 4 5 [6] 7 8 9 7>");
        assert_eq!(render(&page_links(200, 20, 5)), "<4 1 2 3 4 [5] 6 7 8 9 10 6>");
    }

    #[test]
    fn page_past_the_end() {
        assert_eq!(render(&page_links(45, 20, 4)), "<3 1 2 3");
        assert_eq!(render(&page_links(45, 20, 50)), "<3 1");
    }

    #[test]
    fn page_zero_is_page_one() {
        assert_eq!(page_links(45, 20, 0), page_links(45, 20, 1));
    }

    #[test]
    fn current_page_appears_once() {
        for page in 1..=12 {
            let links = page_links(230, 20, page);
            let current: Vec<_> = links.iter().filter(|l| l.kind == Current).collect();
            assert_eq!(current.len(), 1, "page {page}");
            assert_eq!(current[0].page, page);
        }
    }

    #[test]
    fn recomputation_is_stable() {
        assert_eq!(page_links(999, 7, 40), page_links(999, 7, 40));
    }
}
