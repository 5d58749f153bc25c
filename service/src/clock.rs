//! Clock abstraction — the only place the service reads time from.
//!
//! The ledger and voting engine take `now` as a parameter; the service
//! consults its clock once per operation. Production uses [`SystemClock`];
//! tests use [`ManualClock`], where time only advances when told to.

use std::sync::atomic::{AtomicU64, Ordering};
use tally_types::Timestamp;

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// The real system clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A deterministic clock for testing.
///
/// Time only advances when you tell it to.
pub struct ManualClock {
    current: AtomicU64,
}

impl ManualClock {
    pub fn new(initial_secs: u64) -> Self {
        Self {
            current: AtomicU64::new(initial_secs),
        }
    }

    /// Advance time by a number of seconds.
    pub fn advance(&self, secs: u64) {
        self.current.fetch_add(secs, Ordering::SeqCst);
    }

    /// Set the time to a specific value.
    pub fn set(&self, secs: u64) {
        self.current.store(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::new(self.current.load(Ordering::SeqCst))
    }
}
