//! Command implementations for muxguard.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Every handler receives the resolved [`Config`].

mod acquire;
mod guards;
mod instance;
mod run;


use crate::cli::Command;
use muxguard::config::Config;
use muxguard::error::Result;

/// Dispatch a command to its implementation.
///
/// This is the main entry point for command execution. Each command
/// is routed to its handler function.
pub fn dispatch(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Run(args) => run::cmd_run(args, config),
        Command::Acquire(args) => acquire::cmd_acquire(args, config),
        Command::SingleInstance(args) => instance::cmd_single_instance(args, config),
        Command::List => guards::cmd_list(config),
        Command::Clear(args) => guards::cmd_clear(args, config),
    }
}
