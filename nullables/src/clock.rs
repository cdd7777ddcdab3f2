//! Nullable clock: deterministic time for testing.

use std::cell::Cell;

use vestgate_types::time::SECS_PER_DAY;
use vestgate_types::{Clock, Timestamp};

/// A deterministic clock for testing.
///
/// Time only advances when you tell it to, and never moves backwards.
#[derive(Debug, Default)]
pub struct NullClock {
    current: Cell<u64>,
}

impl NullClock {
    pub fn new(initial_secs: u64) -> Self {
        Self {
            current: Cell::new(initial_secs),
        }
    }

    /// Get the current time.
    pub fn now(&self) -> Timestamp {
        Timestamp::new(self.current.get())
    }

    /// Advance time by a number of seconds.
    pub fn advance(&self, secs: u64) {
        self.current.set(self.current.get().saturating_add(secs));
    }

    /// Advance time by whole days.
    pub fn advance_days(&self, days: u64) {
        self.advance(days.saturating_mul(SECS_PER_DAY));
    }

    /// Set the time to a specific value. Returns false (and leaves the clock
    /// untouched) if that would move time backwards.
    pub fn set(&self, secs: u64) -> bool {
        if secs < self.current.get() {
            return false;
        }
        self.current.set(secs);
        true
    }
}

impl Clock for NullClock {
    fn now(&self) -> Timestamp {
        NullClock::now(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_on_demand() {
        let clock = NullClock::new(100);
        assert_eq!(clock.now(), Timestamp::new(100));
        clock.advance(5);
        assert_eq!(Clock::now(&clock), Timestamp::new(105));
        clock.advance_days(1);
        assert_eq!(clock.now().as_secs(), 105 + SECS_PER_DAY);
    }

    #[test]
    fn refuses_to_go_backwards() {
        let clock = NullClock::new(100);
        assert!(!clock.set(99));
        assert_eq!(clock.now().as_secs(), 100);
        assert!(clock.set(100));
        assert!(clock.set(200));
        assert_eq!(clock.now().as_secs(), 200);
    }
}
