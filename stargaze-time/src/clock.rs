//! The clock abstraction the pointing model reads time through.
//!
//! Everything downstream of the model sees time as Unix epoch milliseconds
//! from a [`Clock`], so swapping the real clock for a time-travel stack (or
//! a fixed fake in tests) changes the whole rendered sky with no other code
//! aware of it.

use chrono::Utc;

/// A source of the current time in milliseconds since the Unix epoch.
///
/// Implementations must be usable behind `Arc` from any thread; mutable
/// internals go behind their own locks.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

/// The system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealClock;

impl Clock for RealClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Deterministic clocks for tests.
///
/// Compiled into the library (not `cfg(test)`) so downstream crates can
/// drive the time-dependent machinery in their own tests.
pub mod test_support {
    use super::Clock;
    use std::sync::atomic::{AtomicI64, Ordering};

    /// A clock that only moves when told to.
    pub struct FakeClock {
        now: AtomicI64,
    }

    impl FakeClock {
        pub fn new(epoch_millis: i64) -> Self {
            Self {
                now: AtomicI64::new(epoch_millis),
            }
        }

        pub fn advance(&self, millis: i64) {
            self.now.fetch_add(millis, Ordering::SeqCst);
        }

        pub fn set(&self, epoch_millis: i64) {
            self.now.store(epoch_millis, Ordering::SeqCst);
        }
    }

    impl Clock for FakeClock {
        fn now_millis(&self) -> i64 {
            self.now.load(Ordering::SeqCst)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real_clock_advances() {
        let clock = RealClock;
        let a = clock.now_millis();
        let b = clock.now_millis();
        assert!(b >= a);
        // Sanity: later than 2020-01-01.
        assert!(a > 1_577_836_800_000);
    }
}
