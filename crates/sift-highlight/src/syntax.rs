//! Syntax highlighting for configuration output.

use syntect::{
    easy::HighlightLines,
    highlighting::Style,
    parsing::SyntaxSet,
    util::{LinesWithEndings, as_24_bit_terminal_escaped},
};
use two_face::{
    syntax::extra_newlines as extra_syntaxes,
    theme::{EmbeddedLazyThemeSet, EmbeddedThemeName, extra as extra_themes},
};

/// Highlights TOML for terminal output.
pub struct SyntaxHighlighter {
    /// Syntax definitions (two-face extras include TOML).
    syntax_set: SyntaxSet,
    /// Embedded color themes.
    theme_set: EmbeddedLazyThemeSet,
    /// Theme in use.
    theme: EmbeddedThemeName,
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxHighlighter {
    /// Creates a highlighter with the Dracula theme.
    pub fn new() -> Self {
        Self {
            syntax_set: extra_syntaxes(),
            theme_set: extra_themes(),
            theme: EmbeddedThemeName::Dracula,
        }
    }

    /// Highlights TOML content.
    pub fn highlight_toml(&self, content: &str) -> String {
        let syntax = self
            .syntax_set
            .find_syntax_by_extension("toml")
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self.theme_set.get(self.theme);
        let mut highlighter = HighlightLines::new(syntax, theme);

        let mut output = String::new();
        for line in LinesWithEndings::from(content) {
            let ranges: Vec<(Style, &str)> = highlighter
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_else(|_| vec![(Style::default(), line)]);
            output.push_str(&as_24_bit_terminal_escaped(&ranges[..], false));
        }
        output.push_str("\x1b[0m");
        output
    }
}
