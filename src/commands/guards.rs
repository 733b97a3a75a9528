//! Implementation of the `muxguard list` and `muxguard clear` commands.

use crate::cli::ClearArgs;
use muxguard::config::Config;
use muxguard::error::{GuardError, Result};
use muxguard::guard::{GuardState, clear_abandoned, list_named_guards};

/// Execute the `muxguard list` command.
pub fn cmd_list(config: &Config) -> Result<()> {
    let lock_dir = config.lock_dir();
    let guards = list_named_guards(&lock_dir)?;

    if guards.is_empty() {
        println!("No named guards in {}.", lock_dir.display());
        return Ok(());
    }

    println!("Named guards ({}):", guards.len());
    println!();

    for info in &guards {
        println!("  {}:", info.name);
        println!("    State:      {}", info.state.as_str());
        if let Some(holder) = &info.holder {
            println!("    Owner:      {}", holder.owner);
            if let Some(pid) = holder.pid {
                println!("    PID:        {}", pid);
            }
            println!(
                "    Acquired:   {}",
                holder.acquired_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
            println!("    Age:        {}", holder.age_string());
        }
        println!("    Path:       {}", info.path.display());
        println!();
    }

    // Summary
    let abandoned = guards
        .iter()
        .filter(|g| g.state == GuardState::Abandoned)
        .count();
    if abandoned > 0 {
        println!(
            "Note: {} guard(s) were abandoned. The next acquirer recovers them; \
             `muxguard clear <name> --force` removes the stale metadata now.",
            abandoned
        );
    }

    Ok(())
}

/// Execute the `muxguard clear` command.
pub fn cmd_clear(args: ClearArgs, config: &Config) -> Result<()> {
    // Require --force flag
    if !args.force {
        return Err(GuardError::UserError(format!(
            "refusing to clear guard without --force flag.\n\n\
             Clearing discards the record of the previous holder.\n\
             Only clear guards whose holder has crashed.\n\n\
             To clear the guard, run:\n  muxguard clear {} --force",
            args.name
        )));
    }

    match clear_abandoned(&config.lock_dir(), &args.name)? {
        Some(previous) => {
            println!("Cleared guard: {}", args.name);
            println!();
            println!("Previous holder:");
            println!("  Owner:      {}", previous.owner);
            if let Some(pid) = previous.pid {
                println!("  PID:        {}", pid);
            }
            println!(
                "  Acquired:   {}",
                previous.acquired_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
            println!("  Age:        {}", previous.age_string());
        }
        None => println!("Nothing to clear: {}", args.name),
    }

    Ok(())
}
