//! Counter and resettable value payloads.

use crate::error::Result;
use crate::guard::{Guard, Protected};

/// A counter whose increments are never lost.
#[derive(Debug)]
pub struct Counter<G: Guard> {
    value: Protected<u64, G>,
}

impl<G: Guard> Counter<G> {
    /// Start at zero under `guard`.
    pub fn new(guard: G) -> Self {
        Self {
            value: Protected::with_guard(guard, 0),
        }
    }

    pub fn increment(&self) -> Result<()> {
        self.value.with_blocking(|value| *value += 1)
    }

    pub fn get(&self) -> Result<u64> {
        self.value.with_blocking(|value| *value)
    }
}

/// A value that can be reset to zero.
#[derive(Debug)]
pub struct ResettableValue<G: Guard> {
    value: Protected<u64, G>,
}

impl<G: Guard> ResettableValue<G> {
    pub fn new(guard: G, initial: u64) -> Self {
        Self {
            value: Protected::with_guard(guard, initial),
        }
    }

    /// Reset to zero and return the value now stored.
    pub fn reset(&self) -> Result<u64> {
        self.value.with_blocking(|value| {
            *value = 0;
            *value
        })
    }

    pub fn get(&self) -> Result<u64> {
        self.value.with_blocking(|value| *value)
    }
}
