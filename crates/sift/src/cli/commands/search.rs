//! Implementation of `sift search`.

use std::process::ExitCode;

use sift_index::{SearchError, SearchOutcome, SearchRequest, parse_page};

use crate::cli::{
    args::SearchCommand,
    context::CommandContext,
    output::{JsonSearchOutput, format_page},
};

/// Runs one search and prints the requested page.
pub fn run(ctx: &CommandContext, cmd: &SearchCommand) -> ExitCode {
    let engine = match ctx.engine(cmd.backend.map(Into::into)) {
        Ok(engine) => engine,
        Err(code) => return code,
    };

    let request = SearchRequest::new(cmd.query_text(), parse_page(cmd.page.as_deref()));
    let page = match engine.search(&request) {
        Ok(SearchOutcome::Results(page)) => page,
        Ok(SearchOutcome::NoQuery) => {
            eprintln!("Nothing to search for: the query has no words.");
            return ExitCode::SUCCESS;
        }
        Err(SearchError::Unavailable(e)) => {
            eprintln!("error: search unavailable: {e}");
            return ExitCode::FAILURE;
        }
        Err(e) => {
            eprintln!("error: search failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cmd.json {
        let settings = &ctx.config.search;
        let output = JsonSearchOutput::new(&page, &settings.highlight_open, &settings.highlight_close);
        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: failed to serialize results: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        print!("{}", format_page(&page));
    }

    ExitCode::SUCCESS
}
