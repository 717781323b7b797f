//! Clock abstraction so every mutation can be stamped deterministically in tests.

use std::sync::atomic::{AtomicI64, Ordering};

use super::Timestamp;

/// Source of "now" for the document store.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> Timestamp;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A manually driven clock for tests.
///
/// Starts at a fixed instant and only moves when [`FixedClock::advance`] is called.
#[derive(Debug)]
pub struct FixedClock {
    millis: AtomicI64,
}

impl FixedClock {
    /// Creates a clock frozen at the given instant.
    pub fn at(timestamp: Timestamp) -> Self {
        Self {
            millis: AtomicI64::new(timestamp.as_unix_millis()),
        }
    }

    /// Creates a clock frozen at the given Unix milliseconds.
    pub fn at_millis(millis: i64) -> Self {
        Self {
            millis: AtomicI64::new(millis),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, millis: i64) {
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_unix_millis(self.millis.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_stays_put_until_advanced() {
        let clock = FixedClock::at_millis(10_000);

        assert_eq!(clock.now().as_unix_millis(), 10_000);
        assert_eq!(clock.now().as_unix_millis(), 10_000);

        clock.advance(250);
        assert_eq!(clock.now().as_unix_millis(), 10_250);
    }

    #[test]
    fn system_clock_moves_forward() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();

        assert!(!second.is_before(&first));
    }
}
