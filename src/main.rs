//! Muxguard: mutual-exclusion guards for threads and processes.
//!
//! This is the main entry point for the `muxguard` CLI. It parses arguments,
//! loads the config, installs logging, dispatches to the command handler, and
//! maps errors to exit codes.

mod cli;
mod commands;

use cli::Cli;
use muxguard::config::Config;
use muxguard::error::Result;
use muxguard::{exit_codes, logging};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    match run(cli) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            ExitCode::from(err.exit_code() as u8)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::resolve(cli.config.as_deref())?;
    if let Some(lock_dir) = cli.lock_dir {
        config.lock_dir = Some(lock_dir);
    }

    logging::init(&config.log_filter);
    tracing::debug!(lock_dir = %config.lock_dir().display(), "config resolved");

    commands::dispatch(cli.command, &config)
}
