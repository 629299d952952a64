//! The checkpoint workflow a driver walks through for one job.
//!
//! A job is a linear sequence of checkpoints. After departure the driver
//! reports whether the trip is delayed, which selects one of two branches:
//!
//! ```text
//! normal:  check-in → pickup → departure → incident → arrival → delivery
//! delayed: check-in → pickup → departure → incident → incident photos → arrival → delivery
//! ```
//!
//! The branch is fixed once the incident step is confirmed. Reaching the end
//! of either branch produces a [`DeliveredJob`](crate::models::DeliveredJob)
//! and resets the session.
//!
//! ## Submodules
//!
//! - [`sequence`]: the two step sequences
//! - [`session`]: [`WorkflowSession`], the in-memory state and its setters
//! - [`labels`]: step titles, summaries and icons
//! - [`engine`]: the confirm-and-advance transition
//! - [`builder`]: [`WorkflowBuilder`] for the [`Workflow`] handle
//! - [`actions`]: the handle's operations, with persistence and the
//!   in-flight guard
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use jiff::Timestamp;
//! use waypoint_core::{
//!     models::{Job, JobStatus, TransportType},
//!     services::{NoLocation, SystemClock},
//!     store::StoreBuilder,
//!     WorkflowBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = StoreBuilder::new().build().await?;
//! let workflow = WorkflowBuilder::new(Arc::new(store))
//!     .with_clock(Arc::new(SystemClock))
//!     .with_location(Arc::new(NoLocation))
//!     .build()?;
//!
//! let now = Timestamp::now();
//! workflow
//!     .start(Job {
//!         id: 1,
//!         transport: TransportType::LongHaul,
//!         route: "BKK → CNX".to_string(),
//!         pickup_location: "Bangkok DC".to_string(),
//!         status: JobStatus::Assigned,
//!         scheduled_at: now,
//!         created_at: now,
//!         updated_at: now,
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::{collections::VecDeque, sync::Arc};

use parking_lot::Mutex;

use crate::{
    config::WorkflowConfig,
    models::{ActivityRecord, DeliveredJob},
    services::{Camera, Clock, LocationProvider, RecordStore},
};

pub mod actions;
pub mod builder;
pub mod engine;
pub mod labels;
pub mod sequence;
pub mod session;

#[cfg(test)]
mod tests;

pub use actions::{Confirmation, RetryReport};
pub use builder::WorkflowBuilder;
pub use engine::{Completion, Transition};
pub use labels::{StepState, StepView};
pub use sequence::{max_step, step_names, step_sequence, INCIDENT_SELECT_INDEX};
pub use session::{ConfirmedTimes, LocationState, SessionPhotos, WorkflowSession};

/// A save the store rejected, kept for a manual retry.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingSave {
    Activity(ActivityRecord),
    Delivery(DeliveredJob),
}

impl PendingSave {
    pub fn job_id(&self) -> u64 {
        match self {
            PendingSave::Activity(record) => record.job_id,
            PendingSave::Delivery(record) => record.job_id,
        }
    }

    /// Short description for listings.
    pub fn describe(&self) -> String {
        match self {
            PendingSave::Activity(record) => {
                format!("job {} {} activity", record.job_id, record.step)
            }
            PendingSave::Delivery(record) => format!("job {} delivery record", record.job_id),
        }
    }
}

/// Handle owning one workflow session and its collaborators.
pub struct Workflow {
    pub(crate) session: Arc<tokio::sync::Mutex<WorkflowSession>>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) location: Arc<dyn LocationProvider>,
    pub(crate) camera: Option<Arc<dyn Camera>>,
    pub(crate) store: Arc<dyn RecordStore>,
    pub(crate) config: WorkflowConfig,
    pub(crate) pending: Mutex<Vec<PendingSave>>,
    pub(crate) history: Mutex<VecDeque<DeliveredJob>>,
}

impl Workflow {
    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }
}
