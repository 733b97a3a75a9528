//! Implementation of the `muxguard run` command.

use crate::cli::RunArgs;
use muxguard::config::Config;
use muxguard::error::{GuardError, Result};
use muxguard::scenarios::{self, Scenario};
use std::io;

/// Execute the `muxguard run` command.
///
/// Runs one scenario when a number is given, otherwise all of them.
pub fn cmd_run(args: RunArgs, config: &Config) -> Result<()> {
    // Scenario workers write from their own threads, so the handle must be Send.
    let mut out = io::stdout();

    match args.scenario {
        Some(number) => {
            let scenario = Scenario::from_number(number).ok_or_else(|| {
                GuardError::UserError(format!(
                    "unknown scenario {}: expected a number between 1 and {}",
                    number,
                    Scenario::ALL.len()
                ))
            })?;
            scenarios::run_scenario(scenario, config, &mut out)
        }
        None => scenarios::run_all(config, &mut out),
    }
}
