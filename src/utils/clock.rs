//! Injectable time source.
//!
//! The seed stream itself never looks at the clock. Time only matters when a
//! host asks for a time-derived seed through
//! [`Context::from_clock`](crate::context::Context::from_clock), and tests
//! pin that down with [`MockClock`].

use chrono::{DateTime, Utc};

/// Trait for time sources.
pub trait Clock: Send + Sync {
    /// Current time as a `DateTime<Utc>`.
    fn now_datetime(&self) -> DateTime<Utc>;

    /// Milliseconds since the Unix epoch, clamped at zero.
    fn now_millis(&self) -> u64 {
        u64::try_from(self.now_datetime().timestamp_millis()).unwrap_or(0)
    }
}

/// Wall-clock time via chrono.
///
/// ```rust
/// use tumbler::utils::clock::{Clock, SystemClock};
///
/// assert!(SystemClock.now_millis() > 0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_datetime(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fixed, manually advanced clock for tests.
///
/// ```rust
/// use tumbler::utils::clock::{Clock, MockClock};
///
/// let mut clock = MockClock::from_millis(1_500);
/// clock.advance_millis(500);
/// assert_eq!(clock.now_millis(), 2_000);
/// ```
#[derive(Debug, Clone)]
pub struct MockClock {
    millis: i64,
}

impl MockClock {
    #[must_use]
    pub fn from_millis(millis: i64) -> Self {
        Self { millis }
    }

    pub fn advance_millis(&mut self, millis: i64) {
        self.millis += millis;
    }

    pub fn set_millis(&mut self, millis: i64) {
        self.millis = millis;
    }
}

impl Clock for MockClock {
    fn now_datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis).unwrap_or_default()
    }
}
