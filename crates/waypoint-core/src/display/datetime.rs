//! DateTime display utilities.

use std::fmt;

use jiff::{tz::TimeZone, Timestamp};

/// A `Timestamp` shown in the system time zone.
///
/// Formats as `YYYY-MM-DD HH:MM TZ`, or `HH:MM` with [`LocalDateTime::time_only`].
pub struct LocalDateTime<'a> {
    timestamp: &'a Timestamp,
    time_only: bool,
}

impl<'a> LocalDateTime<'a> {
    pub fn new(timestamp: &'a Timestamp) -> Self {
        Self {
            timestamp,
            time_only: false,
        }
    }

    /// Show only the wall-clock time.
    pub fn time_only(mut self) -> Self {
        self.time_only = true;
        self
    }
}

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let format = if self.time_only {
            "%H:%M"
        } else {
            "%Y-%m-%d %H:%M %Z"
        };
        write!(
            f,
            "{}",
            self.timestamp.to_zoned(TimeZone::system()).strftime(format)
        )
    }
}
