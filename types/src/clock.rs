//! Time source abstraction.
//!
//! Stores never read the wall clock directly; they ask a `Clock`. Tests swap
//! in `mgrant_nullables::NullClock`.

use crate::Timestamp;

pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// The system wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}
