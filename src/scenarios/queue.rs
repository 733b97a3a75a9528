//! FIFO queue payload, used for both the plain queue and producer-consumer.

use crate::error::Result;
use crate::guard::{Guard, Protected};
use std::collections::VecDeque;

/// A FIFO queue shared between threads.
///
/// `dequeue` never waits for items: an empty queue yields `None`.
#[derive(Debug)]
pub struct WorkQueue<T, G: Guard> {
    items: Protected<VecDeque<T>, G>,
}

impl<T, G: Guard> WorkQueue<T, G> {
    pub fn new(guard: G) -> Self {
        Self {
            items: Protected::with_guard(guard, VecDeque::new()),
        }
    }

    pub fn enqueue(&self, item: T) -> Result<()> {
        self.items.with_blocking(|items| items.push_back(item))
    }

    pub fn dequeue(&self) -> Result<Option<T>> {
        self.items.with_blocking(|items| items.pop_front())
    }

    pub fn len(&self) -> Result<usize> {
        self.items.with_blocking(|items| items.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}
