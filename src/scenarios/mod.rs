//! Usage patterns for the guards.
//!
//! Each payload type owns exactly one guard, passed in by the caller, and
//! touches its state only while that guard is held. The [`driver`] runs them
//! with worker threads and prints what happened.

mod access;
mod counter;
pub mod driver;
mod journal;
mod queue;
mod stock;

#[cfg(test)]
mod tests;

pub use access::{AttemptOutcome, CRITICAL_SECTION_MESSAGE, ResourceDesk, critical_section, timed_attempt};
pub use counter::{Counter, ResettableValue};
pub use driver::{Scenario, run_all, run_scenario};
pub use journal::{ConsoleLog, Journal};
pub use queue::WorkQueue;
pub use stock::{Purchase, Stock};
