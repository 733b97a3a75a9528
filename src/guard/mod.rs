//! Mutual-exclusion guards.
//!
//! Two flavours share the [`Guard`] contract:
//! - [`LocalGuard`]: process-local, built on a parking_lot mutex and condvar
//! - [`NamedGuard`]: addressable by name across processes through an advisory
//!   lock on `<lock_dir>/<encoded name>.lock`
//!
//! # Release semantics
//!
//! Holding a guard is not tied to a thread. Any thread with access to the
//! guard may release it unless the guard was created with
//! [`ReleasePolicy::OwnerOnly`]. Releasing a guard nobody holds fails with
//! [`GuardError::ReleaseWithoutAcquire`](crate::error::GuardError::ReleaseWithoutAcquire).
//!
//! # Timeouts
//!
//! A timed-out acquisition is an expected outcome, reported as
//! [`Acquisition::TimedOut`] rather than an error. There are no retries;
//! callers decide what to do instead.
//!
//! # Abandonment
//!
//! A named-guard holder writes [`HolderMetadata`] into the lock file and
//! truncates it on release. If the holder process dies, the operating system
//! drops its advisory lock; the next acquirer succeeds and receives
//! [`Acquisition::Recovered`] with whatever metadata was left behind.
//!
//! # RAII
//!
//! [`Guard::hold`] returns a [`Held`] that releases on drop, and
//! [`Protected`] makes a payload reachable only while its guard is held.

mod inspect;
mod local;
mod metadata;
mod named;
pub mod naming;
mod protected;
mod scoped;
mod types;


// Re-export public API
pub use inspect::{GuardInfo, GuardState, clear_abandoned, inspect_named_guard, list_named_guards};
pub use local::LocalGuard;
pub use metadata::HolderMetadata;
pub use named::{DEFAULT_POLL_INTERVAL, NamedGuard};
pub use protected::{Access, Protected};
pub use scoped::Held;
pub use types::{Acquisition, ReleasePolicy, Timeout};

use crate::error::{GuardError, Result};

/// A mutual-exclusion primitive with explicit acquire and release.
pub trait Guard: Send + Sync {
    /// Human-readable identity, used in logs and errors.
    fn label(&self) -> &str;

    /// Block until the guard is held by the caller or `timeout` elapses.
    fn acquire(&self, timeout: Timeout) -> Result<Acquisition>;

    /// Mark the guard free and wake one waiter.
    ///
    /// Releasing a guard nobody holds is a caller bug. It is logged at
    /// `error!` and returned as
    /// [`GuardError::ReleaseWithoutAcquire`] in every build, so direct callers
    /// can handle it. A [`Held`] that finds its guard already released panics
    /// in debug builds.
    fn release(&self) -> Result<()>;

    /// Whether somebody in this process currently holds the guard.
    fn is_held(&self) -> bool;

    /// Acquire with RAII release. `Ok(None)` means the timeout elapsed.
    fn hold(&self, timeout: Timeout) -> Result<Option<Held<'_, Self>>> {
        let acquisition = self.acquire(timeout)?;
        if acquisition.is_acquired() {
            Ok(Some(Held::new(self, acquisition)))
        } else {
            Ok(None)
        }
    }

    /// Acquire with no timeout and RAII release.
    fn hold_blocking(&self) -> Result<Held<'_, Self>> {
        self.hold(Timeout::Infinite)?.ok_or_else(|| {
            GuardError::Busy(format!(
                "guard '{}' reported a timeout for an infinite wait",
                self.label()
            ))
        })
    }

    /// Run `f` while holding the guard, releasing on every exit path.
    ///
    /// Returns `Ok(None)` when the timeout elapses; `f` is not called then.
    fn run_exclusive<T>(&self, timeout: Timeout, f: impl FnOnce() -> T) -> Result<Option<T>>
    where
        Self: Sized,
    {
        let Some(held) = self.hold(timeout)? else {
            return Ok(None);
        };
        let value = f();
        held.release()?;
        Ok(Some(value))
    }
}
