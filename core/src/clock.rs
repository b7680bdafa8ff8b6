//! Wall clock: the only source of "now" for ledger timestamps.
//!
//! RULE: Nothing outside this module reads the system time.
//! The service is handed a Clock so tests can pin and advance it.

use crate::types::Timestamp;
use chrono::{Duration, Utc};
use std::cell::Cell;

pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// The real UTC clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct FixedClock {
    current: Cell<Timestamp>,
}

impl FixedClock {
    pub fn new(start: Timestamp) -> Self {
        Self { current: Cell::new(start) }
    }

    /// Move forward by `by`. Returns the new instant.
    pub fn advance(&self, by: Duration) -> Timestamp {
        let next = self.current.get() + by;
        self.current.set(next);
        next
    }

    pub fn set(&self, at: Timestamp) {
        self.current.set(at);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.current.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}
