//! Status enumerations for jobs and delivery records.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle of an assigned job.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Job has been assigned to a driver
    #[default]
    Assigned,

    /// Driver has started working on the job
    Pending,

    /// Delivery confirmed
    Delivered,
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "assigned" => Ok(JobStatus::Assigned),
            "pending" => Ok(JobStatus::Pending),
            "delivered" => Ok(JobStatus::Delivered),
            _ => Err(format!("Invalid job status: {s}")),
        }
    }
}

impl JobStatus {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Assigned => "assigned",
            JobStatus::Pending => "pending",
            JobStatus::Delivered => "delivered",
        }
    }

    /// Get status with consistent icon formatting for display.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use waypoint_core::models::JobStatus;
    ///
    /// assert_eq!(JobStatus::Delivered.with_icon(), "✓ Delivered");
    /// assert_eq!(JobStatus::Pending.with_icon(), "➤ Pending");
    /// assert_eq!(JobStatus::Assigned.with_icon(), "○ Assigned");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            JobStatus::Delivered => "✓ Delivered",
            JobStatus::Pending => "➤ Pending",
            JobStatus::Assigned => "○ Assigned",
        }
    }
}

/// Final status of a delivery record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    /// Delivered without incident
    Success,

    /// Delivered after a reported incident
    Delay,

    /// Reserved, not produced by the checkpoint workflow
    Cancel,

    /// Reserved, not produced by the checkpoint workflow
    Standby,
}

impl FromStr for DeliveryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "success" => Ok(DeliveryStatus::Success),
            "delay" => Ok(DeliveryStatus::Delay),
            "cancel" => Ok(DeliveryStatus::Cancel),
            "standby" => Ok(DeliveryStatus::Standby),
            _ => Err(format!("Invalid delivery status: {s}")),
        }
    }
}

impl DeliveryStatus {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Success => "success",
            DeliveryStatus::Delay => "delay",
            DeliveryStatus::Cancel => "cancel",
            DeliveryStatus::Standby => "standby",
        }
    }

    /// Status implied by the session's delayed flag.
    pub fn from_delayed(delayed: bool) -> Self {
        if delayed {
            DeliveryStatus::Delay
        } else {
            DeliveryStatus::Success
        }
    }
}
