//! Confirmation timestamps.

use std::fmt;

use jiff::{tz::TimeZone, Timestamp, Zoned};
use serde::{Deserialize, Serialize};

/// Localized date/time snapshot taken when a step is confirmed.
///
/// `date` and `time` are rendered once in the driver's zone and never
/// re-rendered, so the record shows what the driver saw.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfirmedAt {
    /// Calendar date, `YYYY-MM-DD`
    pub date: String,

    /// Wall-clock time, `HH:MM`
    pub time: String,

    /// The instant itself (UTC)
    pub instant: Timestamp,
}

impl ConfirmedAt {
    /// Snapshot a zoned datetime.
    pub fn from_zoned(zoned: &Zoned) -> Self {
        Self {
            date: zoned.strftime("%Y-%m-%d").to_string(),
            time: zoned.strftime("%H:%M").to_string(),
            instant: zoned.timestamp(),
        }
    }

    /// Snapshot an instant in the given zone.
    pub fn at(instant: Timestamp, tz: TimeZone) -> Self {
        Self::from_zoned(&instant.to_zoned(tz))
    }
}

impl fmt::Display for ConfirmedAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.time)
    }
}
