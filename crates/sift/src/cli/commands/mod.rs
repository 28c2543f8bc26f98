//! Command implementations and dispatch.

pub mod check;
pub mod config;
pub mod init;
pub mod schema;
pub mod search;
pub mod serve;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &CommandContext) -> ExitCode {
    match command {
        Commands::Search(cmd) => search::run(ctx, &cmd),
        Commands::Serve(cmd) => serve::run(ctx, &cmd),
        Commands::Init(cmd) => init::run(ctx, &cmd),
        Commands::Check => check::run(ctx),
        Commands::Config => config::run(ctx),
        Commands::Schema => schema::run(),
    }
}
