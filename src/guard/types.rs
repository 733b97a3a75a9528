//! Guard type definitions: timeouts, acquisition outcomes, release policy.

use super::metadata::HolderMetadata;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// How long an acquisition may wait for the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeout {
    /// Wait until the guard is free. Never yields `TimedOut`.
    Infinite,
    /// Wait at most this long. `Duration::ZERO` is a non-blocking try.
    After(Duration),
}

impl Timeout {
    /// A non-blocking attempt.
    pub const IMMEDIATE: Timeout = Timeout::After(Duration::ZERO);

    /// Build a timeout from an optional millisecond count (`None` = infinite).
    pub fn from_millis(ms: Option<u64>) -> Self {
        match ms {
            Some(ms) => Timeout::After(Duration::from_millis(ms)),
            None => Timeout::Infinite,
        }
    }

    /// The absolute deadline for an attempt that starts at `start`.
    ///
    /// Returns `None` for an infinite timeout, or when the deadline cannot be
    /// represented (treated as infinite).
    pub fn deadline_from(&self, start: Instant) -> Option<Instant> {
        match self {
            Timeout::Infinite => None,
            Timeout::After(d) => start.checked_add(*d),
        }
    }
}

impl From<Duration> for Timeout {
    fn from(d: Duration) -> Self {
        Timeout::After(d)
    }
}

impl std::fmt::Display for Timeout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Timeout::Infinite => write!(f, "infinite"),
            Timeout::After(d) => write!(f, "{}ms", d.as_millis()),
        }
    }
}

/// Outcome of an acquisition attempt.
#[must_use = "an acquired guard must eventually be released"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acquisition {
    /// The guard is now held by the caller.
    Acquired,
    /// The guard is now held by the caller, but its previous holder terminated
    /// without releasing it. Carries that holder's metadata when it was readable.
    Recovered(Option<HolderMetadata>),
    /// The timeout elapsed while another holder kept the guard.
    TimedOut,
}

impl Acquisition {
    /// Whether the caller now holds the guard.
    pub fn is_acquired(&self) -> bool {
        !matches!(self, Acquisition::TimedOut)
    }

    /// Whether the guard was taken over from an abandoned holder.
    pub fn is_recovered(&self) -> bool {
        matches!(self, Acquisition::Recovered(_))
    }
}

/// Who may release a held guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReleasePolicy {
    /// Any thread holding a handle may release (non-owner-scoped).
    #[default]
    AnyHolder,
    /// Only the thread that acquired the guard may release it.
    OwnerOnly,
}
