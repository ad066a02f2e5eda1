//! Test clock — deterministic `Clock` implementation for tests.

use chrono::{DateTime, Utc};
use social_core::clock::Clock;

/// A clock that always returns a fixed point in time, so event timestamps
/// such as `date_posted` and `comment_date` can be asserted exactly.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
