//! Highlighting for sift.
//!
//! - [`TermHighlighter`] marks query-term occurrences in result titles, URLs and
//!   snippets.
//! - [`SyntaxHighlighter`] colors TOML configuration for the terminal.
//! - The free functions style terminal headers and status messages.

#![warn(missing_docs)]

mod syntax;
mod terms;

pub use syntax::SyntaxHighlighter;
pub use terms::{
    DEFAULT_CLOSE, DEFAULT_OPEN, HighlightError, Highlighted, TermHighlighter, merge_ranges,
};

/// ANSI color codes for terminal output.
pub mod colors {
    /// Bold text.
    pub const BOLD: &str = "\x1b[1m";
    /// Cyan text (for headers).
    pub const CYAN: &str = "\x1b[36m";
    /// Green text (for URLs).
    pub const GREEN: &str = "\x1b[32m";
    /// Yellow text (for warnings and matched terms).
    pub const YELLOW: &str = "\x1b[33m";
    /// Red text (for errors).
    pub const RED: &str = "\x1b[31m";
    /// Dim/gray text (for less important info).
    pub const DIM: &str = "\x1b[2m";
    /// Reset all formatting.
    pub const RESET: &str = "\x1b[0m";
}

/// Opening marker for matched terms in terminal output (bold yellow).
pub const TERMINAL_OPEN: &str = "\x1b[1;33m";

/// Formats a header with bold cyan styling.
pub fn header(text: &str) -> String {
    format!("{}{}{}{}", colors::BOLD, colors::CYAN, text, colors::RESET)
}

/// Formats text as a subheader (bold).
pub fn subheader(text: &str) -> String {
    format!("{}{}{}", colors::BOLD, text, colors::RESET)
}

/// Formats text as dimmed/less important.
pub fn dim(text: &str) -> String {
    format!("{}{}{}", colors::DIM, text, colors::RESET)
}

/// Formats text as a URL (green).
pub fn link(text: &str) -> String {
    format!("{}{}{}", colors::GREEN, text, colors::RESET)
}

/// Formats text as a warning (yellow).
pub fn warning(text: &str) -> String {
    format!("{}{}{}", colors::YELLOW, text, colors::RESET)
}

/// Formats text as an error (red).
pub fn error(text: &str) -> String {
    format!("{}{}{}", colors::RED, text, colors::RESET)
}

/// Renders highlighted text for the terminal, matched terms in bold yellow.
pub fn terminal(highlighted: &Highlighted) -> String {
    highlighted.render(TERMINAL_OPEN, colors::RESET)
}
