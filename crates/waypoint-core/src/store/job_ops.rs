//! Job registry operations for the SqliteStore.

use jiff::Timestamp;
use log::info;

use super::SqliteStore;
use crate::{
    error::{Result, WorkflowError},
    models::{ActivityRecord, DeliveredJob, Job, JobStatus},
    params::{AssignJob, Id, ListHistory, ListJobs},
};

fn required(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(WorkflowError::invalid_input(field).with_reason("must not be empty"));
    }
    Ok(value.to_string())
}

impl SqliteStore {
    /// Registers a job in the `assigned` state.
    pub async fn assign_job(&self, params: &AssignJob) -> Result<Job> {
        let route = required("route", &params.route)?;
        let pickup_location = required("pickup_location", &params.pickup_location)?;
        let transport = params.transport;
        let scheduled_at = params.scheduled_at.unwrap_or_else(Timestamp::now);

        let job = self
            .with_db(move |db| db.insert_job(transport, &route, &pickup_location, scheduled_at))
            .await?;
        info!("Assigned job {} ({})", job.id, job.route);
        Ok(job)
    }

    /// Retrieves a job by its ID.
    pub async fn get_job(&self, params: &Id) -> Result<Option<Job>> {
        let id = params.id;
        self.with_db(move |db| db.get_job(id)).await
    }

    /// Retrieves a job, failing when it does not exist.
    pub async fn require_job(&self, params: &Id) -> Result<Job> {
        self.get_job(params)
            .await?
            .ok_or(WorkflowError::JobNotFound { id: params.id })
    }

    /// Lists jobs, optionally by status.
    pub async fn list_jobs(&self, params: &ListJobs) -> Result<Vec<Job>> {
        let status = params.status;
        self.with_db(move |db| db.list_jobs(status)).await
    }

    /// Marks a job as being worked on.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::InvalidInput` for a delivered job and
    /// `WorkflowError::JobNotFound` for an unknown one.
    pub async fn mark_job_pending(&self, params: &Id) -> Result<Job> {
        let id = params.id;
        self.with_db(move |db| {
            let job = db.get_job(id)?.ok_or(WorkflowError::JobNotFound { id })?;
            if job.status == JobStatus::Delivered {
                return Err(WorkflowError::invalid_input("job")
                    .with_reason(format!("job {id} is already delivered")));
            }
            db.set_job_status(id, JobStatus::Pending)
        })
        .await
    }

    /// Activities recorded for a job, in confirmation order.
    pub async fn list_activities(&self, params: &Id) -> Result<Vec<ActivityRecord>> {
        let id = params.id;
        self.with_db(move |db| db.list_activities(id)).await
    }

    /// Delivery record of a job, if it was completed.
    pub async fn get_delivery(&self, params: &Id) -> Result<Option<DeliveredJob>> {
        let id = params.id;
        self.with_db(move |db| db.get_delivered(id)).await
    }

    /// Completed deliveries, newest first.
    pub async fn list_history(&self, params: &ListHistory) -> Result<Vec<DeliveredJob>> {
        let limit = params.limit;
        self.with_db(move |db| db.list_delivered(limit)).await
    }
}
