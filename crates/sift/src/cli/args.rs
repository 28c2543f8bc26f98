//! Clap argument definitions for the `sift` CLI.

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use sift_config::BackendKind;

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "sift")]
#[command(about = "Keyword search over crawled pages")]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log more (-v debug, -vv trace). SIFT_LOG overrides.
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log warnings and errors only
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,
}

/// Supported `sift` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Search for pages matching any of the given words
    #[command(after_help = "\
QUERY:
  Words are lower-cased and split on whitespace. A page matches if it
  matches any word; pages matching more words rank higher.

EXAMPLES:
  sift search rust parser
  sift search rust parser --page 2
  sift search --json --backend solr 'static site'")]
    Search(SearchCommand),

    /// Serve search results as JSON over HTTP
    Serve(ServeCommand),

    /// Initialize sift configuration in the current directory
    Init(InitCommand),

    /// Validate configuration and diagnose issues
    Check,

    /// Show effective configuration
    Config,

    /// Print the SQL schema the relational backend reads
    Schema,
}

/// Arguments for `sift search`.
#[derive(Args, Debug, Clone)]
pub struct SearchCommand {
    /// Query words
    #[arg(required = true)]
    pub query: Vec<String>,

    /// Page to show; invalid values show page 1
    #[arg(short = 'p', long)]
    pub page: Option<String>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    /// Backend to query instead of the configured one
    #[arg(short = 'b', long, value_enum)]
    pub backend: Option<BackendArg>,
}

impl SearchCommand {
    /// Returns the query words joined into one query string.
    pub fn query_text(&self) -> String {
        self.query.join(" ")
    }
}

/// Arguments for `sift serve`.
#[derive(Args, Debug, Clone)]
pub struct ServeCommand {
    /// Address to listen on [default: from config, 127.0.0.1:8080]
    #[arg(long)]
    pub bind: Option<String>,

    /// Backend to query instead of the configured one
    #[arg(short = 'b', long, value_enum)]
    pub backend: Option<BackendArg>,
}

/// Arguments for `sift init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create global ~/.sift.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Backend choice on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendArg {
    /// SQLite keyword-ranking tables
    Relational,
    /// Solr core
    Solr,
}

impl From<BackendArg> for BackendKind {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Relational => Self::Relational,
            BackendArg::Solr => Self::Solr,
        }
    }
}
