//! Time source for event timestamps.
//!
//! Posting, commenting and editing all stamp their events with "now". The
//! aggregate never reads the system clock itself; it asks a [`Clock`] so that
//! tests can pin the timestamps they assert on.

use chrono::{DateTime, Utc};

/// Source of the current time for event timestamps.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by [`Utc::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_monotonic_enough_for_timestamps() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
