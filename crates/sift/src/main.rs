//! Command-line entry point for `sift`.

use std::{env, io, process::ExitCode};

use clap::Parser;
use sift::cli::{
    CommandContext,
    args::{Cli, Commands},
    commands,
};
use tracing_subscriber::EnvFilter;

/// Installs the stderr log subscriber. `SIFT_LOG` overrides the flags.
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if let Ok(env) = env::var("SIFT_LOG") {
        EnvFilter::new(env)
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let ctx = match &cli.command {
        Commands::Init(_) => CommandContext::load_cwd_only(),
        _ => CommandContext::load(),
    };
    let ctx = match ctx {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    commands::run(cli.command, &ctx)
}
