//! Delivery record produced when a workflow completes.

use serde::{Deserialize, Serialize};

use super::{DeliveryStatus, TransportType};

/// Immutable record of a completed job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeliveredJob {
    /// ID of the delivered job
    pub job_id: u64,

    /// Run-sheet number captured at pickup
    pub run_sheet: String,

    /// Pickup confirmation, `YYYY-MM-DD HH:MM`
    pub pickup_time: String,

    /// Delivery confirmation, `YYYY-MM-DD HH:MM`
    pub delivery_time: String,

    /// Route description copied from the job
    pub route: String,

    /// Transport type copied from the job
    pub transport: TransportType,

    /// Delivery date, `YYYY-MM-DD`
    pub date: String,

    /// `success` or `delay`
    pub status: DeliveryStatus,

    /// Incident type, or the free-text description for `other`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_type: Option<String>,

    /// Incident photo confirmation, `YYYY-MM-DD HH:MM`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_time: Option<String>,

    /// Address where the incident photos were confirmed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_address: Option<String>,
}
