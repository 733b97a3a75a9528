//! Default value functions used by the Config struct.

pub(crate) fn default_poll_interval_ms() -> u64 {
    10
}

pub(crate) fn default_attempt_timeout_ms() -> u64 {
    500
}

pub(crate) fn default_initial_stock() -> u32 {
    3
}

pub(crate) fn default_counter_workers() -> usize {
    1000
}

/// Upper bound for `counter_workers`; each worker is an OS thread.
pub const MAX_COUNTER_WORKERS: usize = 10_000;

pub(crate) fn default_log_filter() -> String {
    "muxguard=warn".to_string()
}

/// Name of the lock directory created under the system temp dir.
pub const DEFAULT_LOCK_DIR_NAME: &str = "muxguard";

/// Name of the scenario journal file inside the lock directory.
pub const DEFAULT_JOURNAL_FILE_NAME: &str = "journal.log";
