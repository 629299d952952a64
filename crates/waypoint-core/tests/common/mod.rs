use std::sync::Arc;

use jiff::Timestamp;
use tempfile::TempDir;
use waypoint_core::{
    models::{Coordinate, EncodedImage, Job, PhotoSlot, TransportType},
    params::{AssignJob, Id},
    services::{FixedClock, StaticLocation},
    SqliteStore, StoreBuilder, Workflow, WorkflowBuilder,
};

/// Helper function to create a test store in a temporary directory
pub async fn create_test_store() -> (TempDir, Arc<SqliteStore>) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let store = StoreBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create store");
    (temp_dir, Arc::new(store))
}

pub fn fixed_instant() -> Timestamp {
    "2024-03-01T08:30:00Z".parse().expect("valid timestamp")
}

/// Workflow over `store` with a fixed clock and a pinned location.
pub fn create_workflow(store: Arc<SqliteStore>, address: &str) -> Workflow {
    let coordinate = Coordinate::new(13.7563, 100.5018).expect("valid coordinate");
    WorkflowBuilder::new(store)
        .with_clock(Arc::new(FixedClock::utc(fixed_instant())))
        .with_location(Arc::new(StaticLocation::new(coordinate).with_label(address)))
        .build()
        .expect("Failed to build workflow")
}

/// Assign a job and mark it pending, ready to be started.
pub async fn assign_pending_job(store: &SqliteStore, route: &str) -> Job {
    let job = store
        .assign_job(&AssignJob {
            transport: TransportType::LongHaul,
            route: route.to_string(),
            pickup_location: "Bangkok DC".to_string(),
            scheduled_at: Some(fixed_instant()),
        })
        .await
        .expect("Failed to assign job");
    store
        .mark_job_pending(&Id { id: job.id })
        .await
        .expect("Failed to mark job pending")
}

/// Fill every photo slot of the current step.
pub async fn fill_current_step(workflow: &Workflow) {
    let kind = workflow.snapshot().await.current_kind();
    for slot in PhotoSlot::for_step(kind) {
        workflow
            .set_photo(slot, EncodedImage::new("image/jpeg", vec![0xFF, 0xD8]))
            .await
            .expect("Failed to set photo");
    }
}
