//! Muxguard: mutual-exclusion guards for threads and processes.
//!
//! The [`guard`] module holds the primitives: a process-local guard, a named
//! guard backed by an advisory lock file, RAII holds and guard-protected
//! payloads. The [`scenarios`] module shows them at work on shared counters,
//! queues, stock and files.

pub mod config;
pub mod error;
pub mod exit_codes;
pub mod guard;
pub mod logging;
pub mod scenarios;
