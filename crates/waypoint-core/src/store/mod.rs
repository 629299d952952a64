//! SQLite-backed job registry and record store.
//!
//! [`SqliteStore`] is the durable side of the workflow. It implements
//! [`RecordStore`](crate::services::RecordStore) for activities and delivery
//! records, and owns the job registry the CLI works from:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │    Workflow     │    │   SqliteStore   │    │    Database     │
//! │  (RecordStore)  │───▶│ (job_ops,       │───▶│   (via db/)     │
//! │                 │    │  record_ops)    │    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! Every operation opens its own connection on the blocking pool.
//!
//! # Usage
//!
//! ```rust
//! use waypoint_core::{models::TransportType, params::AssignJob, store::StoreBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = StoreBuilder::new()
//!     .with_database_path(Some("/tmp/waypoint.db"))
//!     .build()
//!     .await?;
//!
//! let job = store
//!     .assign_job(&AssignJob {
//!         transport: TransportType::FirstMile,
//!         route: "Lat Krabang → Bangna DC".to_string(),
//!         pickup_location: "Lat Krabang".to_string(),
//!         scheduled_at: None,
//!     })
//!     .await?;
//! assert!(job.is_open());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use tokio::task;

use crate::{
    db::Database,
    error::{Result, WorkflowError},
};

pub mod builder;
pub mod job_ops;
pub mod record_ops;


pub use builder::StoreBuilder;

/// Job registry and record store on one SQLite file.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pub(crate) db_path: PathBuf,
}

impl SqliteStore {
    /// Creates a new store with the specified database path.
    pub(crate) fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    pub fn database_path(&self) -> &PathBuf {
        &self.db_path
    }

    /// Run `op` against a fresh connection on the blocking pool.
    pub(crate) async fn with_db<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            op(&mut db)
        })
        .await
        .map_err(|e| WorkflowError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}
