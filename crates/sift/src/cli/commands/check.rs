//! Implementation of `sift check`.

use std::process::ExitCode;

use sift_config::{BackendKind, ConfigWarning, discover_config_files};
use sift_highlight::{header, warning};

use crate::cli::context::CommandContext;

/// Lists config files and reports validation warnings.
///
/// Exits with failure when any warning is found, so scripts can gate on it.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config_files = discover_config_files(&ctx.cwd);
    let config = &ctx.config;

    println!("Checking configuration...");
    println!();

    if config_files.is_empty() {
        println!("No configuration files found.");
        println!();
        println!("Run 'sift init' to create a configuration file.");
    } else {
        println!("{}", header("Config files:"));
        for path in &config_files {
            println!("  {}", path.display());
        }
    }
    println!();

    println!("{}", header("Backend:"));
    match config.search.backend {
        BackendKind::Relational => {
            let database = config
                .relational
                .database
                .as_ref()
                .map_or_else(|| String::from("(not set)"), |p| p.display().to_string());
            println!("  relational -> {database}");
        }
        BackendKind::Solr => {
            let url = config.solr.url.as_deref().unwrap_or("(not set)");
            println!("  solr -> {url}");
        }
    }
    println!();

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("No issues found.");
        return ExitCode::SUCCESS;
    }

    println!("{}", warning(&format!("Warnings ({}):", warnings.len())));
    for w in &warnings {
        println!("  - {w}");
    }
    println!();

    print_hints(&warnings);

    ExitCode::FAILURE
}

/// Prints hints for resolving common warnings.
fn print_hints(warnings: &[ConfigWarning]) {
    let mut hints: Vec<&str> = warnings
        .iter()
        .map(|w| match w {
            ConfigWarning::DatabaseNotConfigured => {
                "Set database in the [relational] section, relative to the config file."
            }
            ConfigWarning::DatabaseMissing { .. } => {
                "Check the database path; 'sift schema' prints the expected tables."
            }
            ConfigWarning::SolrUrlMissing => {
                "Set url in the [solr] section to the core URL, e.g. http://localhost:8983/solr/pages."
            }
            ConfigWarning::SolrUrlInvalid { .. } => "Solr URLs must start with http:// or https://.",
            ConfigWarning::NonPositiveBoost { .. } => {
                "Use a positive weight in [solr.boost], or remove the field."
            }
            ConfigWarning::InvalidBindAddress { .. } => {
                "Use host:port for [server] bind, e.g. 127.0.0.1:8080."
            }
        })
        .collect();

    hints.sort_unstable();
    hints.dedup();

    if !hints.is_empty() {
        println!("Hints:");
        for hint in hints {
            println!("  - {hint}");
        }
    }
}
