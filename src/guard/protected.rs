//! Payload that can only be reached while its guard is held.

use super::Guard;
use super::local::LocalGuard;
use super::scoped::Held;
use super::types::Timeout;
use crate::error::Result;
use parking_lot::{Mutex, MutexGuard};
use std::ops::{Deref, DerefMut};

/// Shared mutable state bound to exactly one guard.
///
/// The payload is only reachable through an [`Access`], and an `Access` only
/// exists while the guard is held, so unguarded reads and writes do not
/// compile. The inner mutex is never contended: it merely gives the holder
/// safe `&mut T` access.
#[derive(Debug)]
pub struct Protected<T, G: Guard = LocalGuard> {
    guard: G,
    value: Mutex<T>,
}

impl<T> Protected<T, LocalGuard> {
    /// Protect `value` with a fresh process-local guard.
    pub fn new(label: impl Into<String>, value: T) -> Self {
        Self::with_guard(LocalGuard::new(label), value)
    }
}

impl<T, G: Guard> Protected<T, G> {
    /// Protect `value` with the given guard.
    pub fn with_guard(guard: G, value: T) -> Self {
        Self {
            guard,
            value: Mutex::new(value),
        }
    }

    /// The guard protecting the payload.
    pub fn guard(&self) -> &G {
        &self.guard
    }

    /// Acquire the guard and borrow the payload.
    ///
    /// Returns `Ok(None)` when the timeout elapses.
    pub fn lock(&self, timeout: Timeout) -> Result<Option<Access<'_, T, G>>> {
        let Some(held) = self.guard.hold(timeout)? else {
            return Ok(None);
        };
        Ok(Some(Access {
            value: self.value.lock(),
            held,
        }))
    }

    /// Run `f` on the payload while holding the guard.
    ///
    /// Returns `Ok(None)` when the timeout elapses; `f` is not called then.
    pub fn with<R>(&self, timeout: Timeout, f: impl FnOnce(&mut T) -> R) -> Result<Option<R>> {
        Ok(self.lock(timeout)?.map(|mut access| f(&mut access)))
    }

    /// Run `f` on the payload, waiting as long as needed for the guard.
    pub fn with_blocking<R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R> {
        let mut access = self.lock_blocking()?;
        Ok(f(&mut access))
    }

    fn lock_blocking(&self) -> Result<Access<'_, T, G>> {
        let held = self.guard.hold_blocking()?;
        Ok(Access {
            value: self.value.lock(),
            held,
        })
    }

    /// Consume the container and return the payload.
    pub fn into_inner(self) -> T {
        self.value.into_inner()
    }
}

/// Proof that the guard is held, granting access to the payload.
///
/// Dropping it releases the guard.
pub struct Access<'a, T, G: Guard> {
    // Declared first so the payload borrow ends before the guard is released.
    value: MutexGuard<'a, T>,
    held: Held<'a, G>,
}

impl<T, G: Guard> Access<'_, T, G> {
    /// Whether the guard was taken over from an abandoned holder.
    pub fn was_recovered(&self) -> bool {
        self.held.was_recovered()
    }
}

impl<T, G: Guard> Deref for Access<'_, T, G> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T, G: Guard> DerefMut for Access<'_, T, G> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}
