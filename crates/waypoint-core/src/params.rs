//! Parameter structures for store operations.
//!
//! These carry no framework derives beyond serde. The CLI defines its own
//! clap argument structs and converts them with `From`, so the core stays
//! free of front-end dependencies:
//!
//! ```ignore
//! #[derive(Args)]
//! pub struct AssignJobArgs { /* clap attributes */ }
//!
//! impl From<AssignJobArgs> for AssignJob {
//!     fn from(args: AssignJobArgs) -> Self { /* ... */ }
//! }
//! ```

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::models::{JobStatus, TransportType};

/// Generic parameters for operations requiring just an ID.
///
/// Used for operations like show_job and list_activities.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Id {
    /// The ID of the job to operate on
    pub id: u64,
}

/// Parameters for assigning a new job to the driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignJob {
    /// Long-haul or first-mile
    pub transport: TransportType,
    /// Route description, e.g. origin and destination
    pub route: String,
    /// Where the goods are collected
    pub pickup_location: String,
    /// Planned pickup time; defaults to now
    pub scheduled_at: Option<Timestamp>,
}

/// Parameters for listing jobs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListJobs {
    /// Only jobs in this status; all jobs when absent
    pub status: Option<JobStatus>,
}

/// Parameters for listing delivery history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListHistory {
    /// Maximum number of records, newest first
    pub limit: Option<u32>,
}
