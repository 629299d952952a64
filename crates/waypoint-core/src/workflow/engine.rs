//! The confirm-and-advance transition.

use jiff::Timestamp;
use log::{debug, error, info};

use super::{sequence::INCIDENT_SELECT_INDEX, WorkflowSession};
use crate::{
    config::WorkflowConfig,
    error::{Result, WorkflowError},
    models::{
        ActivityRecord, ConfirmedAt, DeliveredJob, DeliveryStatus, Job, JobStatus, StepKind,
    },
    services::{locate, Clock, LocationProvider},
};

/// A job that reached its terminal step.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// The immutable delivery record
    pub record: DeliveredJob,

    /// The job, now marked delivered
    pub job: Job,
}

/// What one confirmation did.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// The step that was confirmed
    pub step: StepKind,

    /// Timestamp recorded for it; `None` for incident selection
    pub confirmed_at: Option<ConfirmedAt>,

    /// Record to hand to persistence, for timestamped steps
    pub activity: Option<ActivityRecord>,

    /// Set when the confirmation completed the job
    pub completion: Option<Completion>,
}

impl WorkflowSession {
    /// Confirm the current step and move the cursor.
    ///
    /// The caller checks [`WorkflowSession::check_ready`] first; this method
    /// only refuses when the session has no job, or when the terminal step is
    /// reached without the data a delivery record requires. In both cases the
    /// session is left unchanged.
    ///
    /// The address refresh is awaited before the cursor moves. Its failure is
    /// logged and the previous address is kept.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::NoActiveSession` without a job and
    /// `WorkflowError::IncompleteRecord` for a terminal confirmation that
    /// cannot build its record.
    pub async fn confirm_and_advance(
        &mut self,
        clock: &dyn Clock,
        location: &dyn LocationProvider,
        config: &WorkflowConfig,
    ) -> Result<Transition> {
        let job_id = self.active_job()?.id;
        let kind = self.current_kind();
        let terminal = self.step == self.max_step();

        if terminal {
            self.check_record_prerequisites(job_id)?;
        }

        if self.step == INCIDENT_SELECT_INDEX {
            self.step += 1;
            debug!(
                "Job {job_id}: incident selection confirmed, delayed={}, branch locked",
                self.is_delayed()
            );
            return Ok(Transition {
                step: kind,
                confirmed_at: None,
                activity: None,
                completion: None,
            });
        }

        let now = clock.now();
        self.times.stamp(kind, now.clone());
        self.refresh_location(config, location, now.instant).await;

        if kind == StepKind::IncidentPhotos {
            self.incident_address = self.location.address.clone();
        }

        let activity = self.activity_record(job_id, kind, &now);

        if !terminal {
            self.step += 1;
            debug!(
                "Job {job_id}: confirmed {} at {now}, now at step {} ({})",
                kind.as_str(),
                self.step,
                self.current_kind().as_str()
            );
            return Ok(Transition {
                step: kind,
                confirmed_at: Some(now),
                activity: Some(activity),
                completion: None,
            });
        }

        let completion = self.complete(job_id)?;
        info!(
            "Job {job_id} delivered with status {}",
            completion.record.status.as_str()
        );
        self.reset();

        Ok(Transition {
            step: kind,
            confirmed_at: Some(now),
            activity: Some(activity),
            completion: Some(completion),
        })
    }

    async fn refresh_location(
        &mut self,
        config: &WorkflowConfig,
        location: &dyn LocationProvider,
        synced_at: Timestamp,
    ) {
        let fix = locate(
            location,
            self.location.coordinate,
            &config.lang,
            config.location_timeout(),
        )
        .await;

        if let Some(coordinate) = fix.coordinate {
            self.location.coordinate = Some(coordinate);
        }
        if let Some(address) = fix.address {
            self.location.address = Some(address.formatted);
            self.location.synced_at = Some(synced_at);
        }
    }

    fn activity_record(&self, job_id: u64, kind: StepKind, at: &ConfirmedAt) -> ActivityRecord {
        ActivityRecord {
            job_id,
            step: kind,
            confirmed_at: at.clone(),
            address: self.location.address.clone(),
            run_sheet: self.times.pickup.as_ref().map(|_| self.run_sheet.clone()),
            incident_type: if kind == StepKind::IncidentPhotos {
                self.incident.record_label()
            } else {
                None
            },
            photos: self.photos.manifest(kind),
        }
    }

    fn check_record_prerequisites(&self, job_id: u64) -> Result<()> {
        let mut missing = Vec::new();
        if self.times.pickup.is_none() {
            missing.push("pickup timestamp");
        }
        if self.run_sheet.is_empty() {
            missing.push("run sheet number");
        }
        if self.is_delayed() && self.incident.incident_type().is_none() {
            missing.push("incident type");
        }
        if missing.is_empty() {
            return Ok(());
        }

        let missing = missing.join(", ");
        error!("Job {job_id}: terminal confirmation without {missing}");
        Err(WorkflowError::IncompleteRecord { job_id, missing })
    }

    fn complete(&self, job_id: u64) -> Result<Completion> {
        let incomplete = |missing: &str| WorkflowError::IncompleteRecord {
            job_id,
            missing: missing.to_string(),
        };
        let job = self.active_job()?;
        let pickup = self.times.pickup.as_ref().ok_or_else(|| incomplete("pickup timestamp"))?;
        let delivery = self
            .times
            .delivery
            .as_ref()
            .ok_or_else(|| incomplete("delivery timestamp"))?;

        let delayed = self.is_delayed();
        let record = DeliveredJob {
            job_id,
            run_sheet: self.run_sheet.clone(),
            pickup_time: pickup.to_string(),
            delivery_time: delivery.to_string(),
            route: job.route.clone(),
            transport: job.transport,
            date: delivery.date.clone(),
            status: DeliveryStatus::from_delayed(delayed),
            incident_type: self.incident.record_label(),
            incident_time: if delayed {
                self.times.incident.as_ref().map(ToString::to_string)
            } else {
                None
            },
            incident_address: if delayed {
                self.incident_address.clone()
            } else {
                None
            },
        };

        let mut job = job.clone();
        job.status = JobStatus::Delivered;
        job.updated_at = delivery.instant;

        Ok(Completion { record, job })
    }
}
