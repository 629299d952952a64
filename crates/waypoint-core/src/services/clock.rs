//! Clock implementations.

use jiff::{tz::TimeZone, Timestamp, Zoned};

use super::Clock;
use crate::models::ConfirmedAt;

/// Wall clock in the system time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> ConfirmedAt {
        ConfirmedAt::from_zoned(&Zoned::now())
    }
}

/// Clock that always reports the same instant.
#[derive(Debug, Clone)]
pub struct FixedClock {
    instant: Timestamp,
    tz: TimeZone,
}

impl FixedClock {
    pub fn new(instant: Timestamp, tz: TimeZone) -> Self {
        Self { instant, tz }
    }

    /// A fixed instant in UTC.
    pub fn utc(instant: Timestamp) -> Self {
        Self::new(instant, TimeZone::UTC)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> ConfirmedAt {
        ConfirmedAt::at(self.instant, self.tz.clone())
    }
}
