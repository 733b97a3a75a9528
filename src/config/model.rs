//! Config struct definition and default implementation.

use super::types::*;
use crate::guard::ReleasePolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for muxguard.
///
/// This struct represents the contents of `muxguard.yaml`.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Guard settings
    // =========================================================================
    /// Directory holding named-guard lock files (default: `<temp>/muxguard`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock_dir: Option<PathBuf>,

    /// Milliseconds between attempts on a contended named guard.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Timeout for `acquire` when none is given on the command line
    /// (absent = wait forever).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_timeout_ms: Option<u64>,

    /// Who may release a process-local guard.
    #[serde(default)]
    pub release_policy: ReleasePolicy,

    // =========================================================================
    // Scenario settings
    // =========================================================================
    /// Timeout used by the timed-attempt scenario.
    #[serde(default = "default_attempt_timeout_ms")]
    pub attempt_timeout_ms: u64,

    /// Units of stock at the start of the bounded-stock scenario.
    #[serde(default = "default_initial_stock")]
    pub initial_stock: u32,

    /// Number of threads incrementing the counter scenario.
    #[serde(default = "default_counter_workers")]
    pub counter_workers: usize,

    /// File appended to by the journal scenario
    /// (default: `journal.log` inside the lock directory).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal_file: Option<PathBuf>,

    // =========================================================================
    // Logging settings
    // =========================================================================
    /// `tracing` filter directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lock_dir: None,
            poll_interval_ms: default_poll_interval_ms(),
            default_timeout_ms: None,
            release_policy: ReleasePolicy::default(),
            attempt_timeout_ms: default_attempt_timeout_ms(),
            initial_stock: default_initial_stock(),
            counter_workers: default_counter_workers(),
            journal_file: None,
            log_filter: default_log_filter(),
        }
    }
}
