//! Implementation of the `muxguard acquire` command.

use crate::cli::AcquireArgs;
use muxguard::config::Config;
use muxguard::error::{GuardError, Result};
use muxguard::guard::{Guard, NamedGuard, Timeout};
use std::thread;
use std::time::Duration;

/// Execute the `muxguard acquire` command.
///
/// # Behavior
///
/// - Waits for the named guard up to `--timeout-ms` (config default otherwise)
/// - Reports whether an abandoned holder was taken over
/// - Holds the guard for `--hold-ms`, then releases it
/// - Fails with `Busy` (exit code 2) when the timeout elapses
pub fn cmd_acquire(args: AcquireArgs, config: &Config) -> Result<()> {
    let timeout = match args.timeout_ms {
        Some(ms) => Timeout::After(Duration::from_millis(ms)),
        None => config.default_timeout(),
    };

    let guard = NamedGuard::open_with(&config.lock_dir(), &args.name, config.poll_interval())?;

    let Some(held) = guard.hold(timeout)? else {
        return Err(GuardError::Busy(format!(
            "guard '{}' is still held after waiting {}",
            args.name, timeout
        )));
    };

    if held.was_recovered() {
        println!("Recovered abandoned guard: {}", args.name);
        match held.previous_holder() {
            Some(previous) => {
                println!("  Previous owner: {}", previous.owner);
                if let Some(pid) = previous.pid {
                    println!("  Previous PID:   {}", pid);
                }
                println!(
                    "  Acquired at:    {}",
                    previous.acquired_at.format("%Y-%m-%d %H:%M:%S UTC")
                );
            }
            None => println!("  Previous holder metadata was unreadable."),
        }
    } else {
        println!("Acquired guard: {}", args.name);
    }
    println!("  Lock file:      {}", guard.path().display());

    if args.hold_ms > 0 {
        println!("Holding for {}ms...", args.hold_ms);
        thread::sleep(Duration::from_millis(args.hold_ms));
    }

    held.release()?;
    println!("Released guard: {}", args.name);

    Ok(())
}
