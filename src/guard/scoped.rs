//! RAII scoped acquisition.

use super::Guard;
use super::metadata::HolderMetadata;
use super::types::Acquisition;
use crate::error::{GuardError, Result};

/// RAII hold on a guard.
///
/// When dropped, the guard is released. This covers normal scope exit, early
/// return, `?` propagation, and panic unwinding. If release fails during drop,
/// a warning is logged but no panic occurs.
#[derive(Debug)]
#[must_use = "dropping a Held releases the guard immediately"]
pub struct Held<'a, G: Guard + ?Sized> {
    guard: &'a G,

    /// How the hold was obtained.
    acquisition: Acquisition,

    /// Whether the guard has been released manually.
    released: bool,
}

impl<'a, G: Guard + ?Sized> Held<'a, G> {
    /// Wrap an acquisition that already succeeded.
    pub(crate) fn new(guard: &'a G, acquisition: Acquisition) -> Self {
        debug_assert!(acquisition.is_acquired());
        Self {
            guard,
            acquisition,
            released: false,
        }
    }

    /// The guard being held.
    pub fn guard(&self) -> &'a G {
        self.guard
    }

    /// Whether the hold was taken over from an abandoned holder.
    pub fn was_recovered(&self) -> bool {
        self.acquisition.is_recovered()
    }

    /// Metadata of the abandoned previous holder, when recovered and readable.
    pub fn previous_holder(&self) -> Option<&HolderMetadata> {
        match &self.acquisition {
            Acquisition::Recovered(holder) => holder.as_ref(),
            _ => None,
        }
    }

    /// Manually release the guard.
    ///
    /// Use this to release before the end of scope and handle errors
    /// explicitly.
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        let result = self.guard.release();
        check_stray_release(self.guard, &result);
        result
    }
}

impl<G: Guard + ?Sized> Drop for Held<'_, G> {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        let result = self.guard.release();
        check_stray_release(self.guard, &result);
        if let Err(e) = result {
            tracing::warn!(guard = %self.guard.label(), error = %e, "failed to release guard");
        }
    }
}

/// A live hold finding its guard already free means some other code released
/// it out from under the hold. Debug builds panic on that.
fn check_stray_release<G: Guard + ?Sized>(guard: &G, result: &Result<()>) {
    if cfg!(debug_assertions)
        && !std::thread::panicking()
        && matches!(result, Err(GuardError::ReleaseWithoutAcquire(_)))
    {
        panic!(
            "guard '{}' was released while a hold on it was still live",
            guard.label()
        );
    }
}
