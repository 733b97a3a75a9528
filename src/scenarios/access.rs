//! Scenarios that guard an action rather than a value.

use crate::error::Result;
use crate::guard::{Guard, Timeout};
use std::time::Duration;

/// Message returned by [`critical_section`].
pub const CRITICAL_SECTION_MESSAGE: &str = "critical section access granted";

/// Enter a critical section guarded by `guard` and report it.
pub fn critical_section<G: Guard>(guard: &G) -> Result<&'static str> {
    let _held = guard.hold_blocking()?;
    Ok(CRITICAL_SECTION_MESSAGE)
}

/// A shared resource that users take turns to access.
#[derive(Debug)]
pub struct ResourceDesk<G: Guard> {
    guard: G,
}

impl<G: Guard> ResourceDesk<G> {
    pub fn new(guard: G) -> Self {
        Self { guard }
    }

    /// Access the resource on behalf of `user`.
    pub fn access(&self, user: &str) -> Result<String> {
        let _held = self.guard.hold_blocking()?;
        Ok(format!("{} accessed the resource", user))
    }
}

/// Result of [`timed_attempt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Entered,
    TimedOut,
}

impl std::fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttemptOutcome::Entered => write!(f, "entered successfully"),
            AttemptOutcome::TimedOut => write!(f, "timed out waiting for the guard"),
        }
    }
}

/// Try to enter within `wait`; give up and report it otherwise.
pub fn timed_attempt<G: Guard>(guard: &G, wait: Duration) -> Result<AttemptOutcome> {
    let entered = guard.run_exclusive(Timeout::After(wait), || ())?;
    Ok(match entered {
        Some(()) => AttemptOutcome::Entered,
        None => AttemptOutcome::TimedOut,
    })
}
