//! Implementation of the `muxguard single-instance` command.

use crate::cli::SingleInstanceArgs;
use muxguard::config::Config;
use muxguard::error::{GuardError, Result};
use muxguard::guard::{Guard, NamedGuard, inspect_named_guard};
use std::thread;
use std::time::Duration;

/// Execute the `muxguard single-instance` command.
///
/// Tries to take the named guard without waiting. When another process
/// holds it, fails with `AlreadyRunning` (exit code 5); otherwise keeps the
/// guard for `--hold-ms` and exits.
pub fn cmd_single_instance(args: SingleInstanceArgs, config: &Config) -> Result<()> {
    let lock_dir = config.lock_dir();
    let (guard, fresh) =
        NamedGuard::try_create_with(&lock_dir, &args.name, config.poll_interval())?;

    if !fresh {
        let holder = inspect_named_guard(&lock_dir, &args.name)
            .ok()
            .and_then(|info| info.holder)
            .map(|holder| match holder.pid {
                Some(pid) => format!(" (held by {}, pid {})", holder.owner, pid),
                None => format!(" (held by {})", holder.owner),
            })
            .unwrap_or_default();
        return Err(GuardError::AlreadyRunning(format!("{}{}", args.name, holder)));
    }

    println!("No other instance running: {}", args.name);

    if args.hold_ms > 0 {
        println!("Running for {}ms...", args.hold_ms);
        thread::sleep(Duration::from_millis(args.hold_ms));
    }

    guard.release()?;
    println!("Instance finished: {}", args.name);

    Ok(())
}
