//! hibp-guard CLI - breached-password checks from the command line
//!
//! Commands live in separate modules; this file wires parsing, logging
//! and dispatch.
use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
pub mod error;
mod logging;

use cli::{Cli, Commands};
use logging::initialize_logging;

/// Execute the hibp-guard CLI with the current process arguments.
///
/// # Errors
///
/// Returns a [`error::CliError`] carrying the exit category when a credential
/// is breached or the invocation is invalid.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    initialize_logging(&cli)?;
    execute_command(cli).await
}

async fn execute_command(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Check(args) => commands::check(args).await,
        Commands::Digest(input) => commands::digest(&input),
        Commands::Rules => {
            commands::list_rules();
            Ok(())
        },
    }
}
