//! Core library for the Waypoint delivery-driver workflow.
//!
//! A driver works one job at a time through a fixed series of checkpoints:
//! check-in, pickup, departure, an incident report, optionally incident
//! photos, arrival and proof of delivery. Each checkpoint is gated on its
//! photos and captured data, stamped with the local time and the current
//! address when confirmed, and the last one produces an immutable
//! [`DeliveredJob`](models::DeliveredJob).
//!
//! # Layout
//!
//! - [`workflow`]: the session state machine and the [`Workflow`] handle
//! - [`services`]: collaborator traits (clock, location, camera, record
//!   store) and their stock implementations
//! - [`store`]: [`SqliteStore`], the job registry and durable record store
//! - [`models`]: jobs, steps, photo slots, records
//! - [`display`]: markdown rendering for the CLI
//! - [`config`], [`sharpness`], [`runsheet`]: tunables and input checks
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use waypoint_core::{
//!     models::TransportType,
//!     params::{AssignJob, Id},
//!     services::SystemClock,
//!     StoreBuilder, WorkflowBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(
//!     StoreBuilder::new()
//!         .with_database_path(Some("waypoint.db"))
//!         .build()
//!         .await?,
//! );
//!
//! let job = store
//!     .assign_job(&AssignJob {
//!         transport: TransportType::LongHaul,
//!         route: "Bangkok DC → Chiang Mai Hub".to_string(),
//!         pickup_location: "Bangkok DC".to_string(),
//!         scheduled_at: None,
//!     })
//!     .await?;
//!
//! let workflow = WorkflowBuilder::new(store.clone())
//!     .with_clock(Arc::new(SystemClock))
//!     .build()?;
//! workflow.start(store.mark_job_pending(&Id { id: job.id }).await?).await?;
//! println!("{}", workflow.snapshot().await.current_kind().title());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod db;
pub mod display;
pub mod error;
pub mod models;
pub mod params;
pub mod runsheet;
pub mod services;
pub mod sharpness;
pub mod store;
pub mod workflow;

// Re-export commonly used types
pub use config::WorkflowConfig;
pub use db::Database;
pub use display::{
    Activities, ConfirmResult, CreateResult, History, Jobs, OperationStatus, SessionProgress,
};
pub use error::{Result, WorkflowError};
pub use params::{AssignJob, Id, ListHistory, ListJobs};
pub use store::{SqliteStore, StoreBuilder};
pub use workflow::{Confirmation, Workflow, WorkflowBuilder, WorkflowSession};
