//! Implementation of `sift config`.

use std::process::ExitCode;

use sift_highlight::{SyntaxHighlighter, dim};

use crate::cli::context::CommandContext;

/// Shows effective configuration settings.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config = &ctx.config;
    if let Some(root) = &config.config_root {
        println!("{}", dim(&format!("# config root: {}", root.display())));
    }
    match config.settings_to_toml() {
        Ok(toml) => {
            print!("{}", SyntaxHighlighter::new().highlight_toml(&toml));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize configuration: {e}");
            ExitCode::FAILURE
        }
    }
}
