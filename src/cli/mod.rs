//! CLI argument parsing for muxguard.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Muxguard: mutual-exclusion guards for threads and processes.
///
/// Guards are either process-local or named. A named guard is an advisory
/// lock on a file in the lock directory, so any process using the same lock
/// directory and name contends for it.
#[derive(Parser, Debug)]
#[command(name = "muxguard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a YAML config file (default: ./muxguard.yaml when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding named-guard lock files.
    #[arg(long, global = true)]
    pub lock_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for muxguard.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the guard scenarios.
    ///
    /// Runs a single scenario by number (1-11), or all of them in order.
    Run(RunArgs),

    /// Acquire a named guard, hold it, then release it.
    ///
    /// Exits with code 2 if the guard is still held elsewhere when the
    /// timeout elapses.
    Acquire(AcquireArgs),

    /// Check that no other instance holds a named guard.
    ///
    /// Exits with code 5 if another instance is already running.
    SingleInstance(SingleInstanceArgs),

    /// List named guards in the lock directory.
    ///
    /// Shows each guard's state and, for held or abandoned guards, its holder.
    List,

    /// Clear the metadata left behind by a dead holder.
    ///
    /// Requires --force flag to prevent accidental clearing.
    Clear(ClearArgs),
}

/// Arguments for the `run` command.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Scenario number (1-11). If omitted, runs every scenario.
    pub scenario: Option<u8>,
}

/// Arguments for the `acquire` command.
#[derive(Parser, Debug)]
pub struct AcquireArgs {
    /// Name of the guard.
    pub name: String,

    /// Give up after this many milliseconds (default: config, else wait forever).
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Milliseconds to hold the guard before releasing it.
    #[arg(long, default_value_t = 0)]
    pub hold_ms: u64,
}

/// Arguments for the `single-instance` command.
#[derive(Parser, Debug)]
pub struct SingleInstanceArgs {
    /// Name of the guard identifying the application.
    pub name: String,

    /// Milliseconds to keep running (and holding the guard) after the check.
    #[arg(long, default_value_t = 0)]
    pub hold_ms: u64,
}

/// Arguments for the `clear` command.
#[derive(Parser, Debug)]
pub struct ClearArgs {
    /// Name of the guard to clear.
    pub name: String,

    /// Force clearing the guard (required for safety).
    #[arg(long)]
    pub force: bool,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
