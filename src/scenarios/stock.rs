//! Bounded stock payload.

use crate::error::Result;
use crate::guard::{Guard, Protected};

/// Outcome of a purchase attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purchase {
    /// One unit was taken; `remaining` units are left.
    Bought { remaining: u32 },
    /// Nothing was left to take.
    OutOfStock,
}

impl Purchase {
    pub fn describe(&self, customer: &str) -> String {
        match self {
            Purchase::Bought { remaining } => {
                format!("{} bought one, remaining stock: {}", customer, remaining)
            }
            Purchase::OutOfStock => format!("{} could not buy: out of stock", customer),
        }
    }
}

/// A finite number of units that customers compete for.
///
/// Checking and decrementing happen under one hold, so stock never goes
/// negative and no unit is sold twice.
#[derive(Debug)]
pub struct Stock<G: Guard> {
    units: Protected<u32, G>,
}

impl<G: Guard> Stock<G> {
    pub fn new(guard: G, initial: u32) -> Self {
        Self {
            units: Protected::with_guard(guard, initial),
        }
    }

    pub fn purchase(&self, customer: &str) -> Result<Purchase> {
        let outcome = self.units.with_blocking(|units| {
            if *units > 0 {
                *units -= 1;
                Purchase::Bought { remaining: *units }
            } else {
                Purchase::OutOfStock
            }
        })?;
        tracing::debug!(customer, ?outcome, "purchase attempt");
        Ok(outcome)
    }

    pub fn remaining(&self) -> Result<u32> {
        self.units.with_blocking(|units| *units)
    }
}
