//! Process-local guard.

use super::types::{Acquisition, ReleasePolicy, Timeout};
use super::Guard;
use crate::error::{GuardError, Result};
use parking_lot::{Condvar, Mutex};
use std::thread::{self, ThreadId};
use std::time::Instant;

/// A binary, process-local guard.
///
/// Unlike `std::sync::Mutex`, holding the guard is not tied to a borrow or to
/// the acquiring thread: with [`ReleasePolicy::AnyHolder`] any thread that can
/// reach the guard may release it. Waiters are woken one at a time in no
/// particular order.
#[derive(Debug)]
pub struct LocalGuard {
    label: String,
    policy: ReleasePolicy,
    state: Mutex<LocalState>,
    available: Condvar,
}

#[derive(Debug, Default)]
struct LocalState {
    held: bool,
    owner: Option<ThreadId>,
}

impl LocalGuard {
    /// Create an unlocked guard that any holder may release.
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_policy(label, ReleasePolicy::AnyHolder)
    }

    /// Create an unlocked guard with an explicit release policy.
    pub fn with_policy(label: impl Into<String>, policy: ReleasePolicy) -> Self {
        Self {
            label: label.into(),
            policy,
            state: Mutex::new(LocalState::default()),
            available: Condvar::new(),
        }
    }

    /// The release policy this guard enforces.
    pub fn policy(&self) -> ReleasePolicy {
        self.policy
    }
}

impl Guard for LocalGuard {
    fn label(&self) -> &str {
        &self.label
    }

    fn acquire(&self, timeout: Timeout) -> Result<Acquisition> {
        let deadline = timeout.deadline_from(Instant::now());
        let mut state = self.state.lock();

        while state.held {
            match deadline {
                None => self.available.wait(&mut state),
                Some(deadline) => {
                    if Instant::now() >= deadline {
                        tracing::debug!(guard = %self.label, %timeout, "acquire timed out");
                        return Ok(Acquisition::TimedOut);
                    }
                    // Spurious and stolen wakeups loop back to the deadline check.
                    let _ = self.available.wait_until(&mut state, deadline);
                }
            }
        }

        state.held = true;
        state.owner = Some(thread::current().id());
        tracing::debug!(guard = %self.label, "acquired");
        Ok(Acquisition::Acquired)
    }

    fn release(&self) -> Result<()> {
        let mut state = self.state.lock();

        if !state.held {
            tracing::error!(guard = %self.label, "release without acquire");
            return Err(GuardError::ReleaseWithoutAcquire(self.label.clone()));
        }

        if self.policy == ReleasePolicy::OwnerOnly && state.owner != Some(thread::current().id())
        {
            tracing::error!(guard = %self.label, "release attempted by non-owner thread");
            return Err(GuardError::NotOwner(self.label.clone()));
        }

        state.held = false;
        state.owner = None;
        drop(state);

        self.available.notify_one();
        tracing::debug!(guard = %self.label, "released");
        Ok(())
    }

    fn is_held(&self) -> bool {
        self.state.lock().held
    }
}
