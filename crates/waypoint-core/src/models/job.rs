//! Job model definition and related functionality.

use std::str::FromStr;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::JobStatus;

/// Kind of transport a job uses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransportType {
    /// Line haul between hubs
    LongHaul,
    /// Collection from the shipper to the first hub
    FirstMile,
}

impl TransportType {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportType::LongHaul => "long_haul",
            TransportType::FirstMile => "first_mile",
        }
    }
}

impl FromStr for TransportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "long_haul" | "longhaul" => Ok(TransportType::LongHaul),
            "first_mile" | "firstmile" => Ok(TransportType::FirstMile),
            _ => Err(format!("Invalid transport type: {s}")),
        }
    }
}

/// A logistics job assigned to a driver.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Job {
    /// Unique identifier for the job
    pub id: u64,

    /// Transport type
    pub transport: TransportType,

    /// Route description, e.g. "BKK → CNX"
    pub route: String,

    /// Where the goods are collected
    pub pickup_location: String,

    /// Lifecycle status
    #[serde(default)]
    pub status: JobStatus,

    /// When the job is scheduled to start (UTC)
    pub scheduled_at: Timestamp,

    /// Timestamp when the job was assigned (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the job was last updated (UTC)
    pub updated_at: Timestamp,
}

impl Job {
    /// Whether a workflow may still be started for this job.
    pub fn is_open(&self) -> bool {
        self.status != JobStatus::Delivered
    }
}
