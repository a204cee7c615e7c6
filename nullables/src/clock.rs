//! Nullable clock — frozen time that tests move by hand.

use mgrant_types::{Clock, Timestamp};
use std::cell::Cell;

/// Stands in for [`mgrant_types::SystemClock`]. Countdowns and comment ages
/// only change when a test calls [`NullClock::advance`] or [`NullClock::set`].
pub struct NullClock {
    at: Cell<Timestamp>,
}

impl NullClock {
    pub fn new(initial_secs: u64) -> Self {
        Self {
            at: Cell::new(Timestamp::new(initial_secs)),
        }
    }

    pub fn advance(&self, secs: u64) {
        self.at.set(self.at.get().plus_secs(secs));
    }

    pub fn advance_minutes(&self, minutes: u64) {
        self.advance(minutes.saturating_mul(60));
    }

    /// Jump to an absolute time, backwards included.
    pub fn set(&self, secs: u64) {
        self.at.set(Timestamp::new(secs));
    }
}

impl Clock for NullClock {
    fn now(&self) -> Timestamp {
        self.at.get()
    }
}
