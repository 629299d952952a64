//! Operations on the workflow handle.
//!
//! Every mutation takes the session with `try_lock`: while a confirmation is
//! awaiting its address refresh or its saves, any other mutation fails with
//! `WorkflowError::SessionBusy` instead of queueing behind it.

use log::{debug, info, warn};
use tokio::sync::MutexGuard;

use super::{PendingSave, Transition, Workflow, WorkflowSession};
use crate::{
    error::{Result, WorkflowError},
    models::{ActivityId, DeliveredJob, EncodedImage, IncidentType, Job, JobStatus, PhotoSlot},
    runsheet,
    services::{capture_sharp, CaptureContext},
};

/// Outcome of a confirmation that went through the engine.
///
/// The session has moved even when a save failed; failed saves are queued
/// for [`Workflow::retry_pending`] and reported in `save_errors`.
#[derive(Debug)]
pub struct Confirmation {
    pub transition: Transition,
    pub activity_id: Option<ActivityId>,
    pub save_errors: Vec<WorkflowError>,
}

impl Confirmation {
    pub fn is_saved(&self) -> bool {
        self.save_errors.is_empty()
    }

    /// The delivery record, when this confirmation completed the job.
    pub fn delivered(&self) -> Option<&DeliveredJob> {
        self.transition.completion.as_ref().map(|c| &c.record)
    }
}

/// Result of a manual retry of queued saves.
#[derive(Debug, Default)]
pub struct RetryReport {
    pub saved: usize,
    pub errors: Vec<WorkflowError>,
}

impl RetryReport {
    pub fn remaining(&self) -> usize {
        self.errors.len()
    }
}

impl Workflow {
    fn lock_session(&self) -> Result<MutexGuard<'_, WorkflowSession>> {
        self.session.try_lock().map_err(|_| WorkflowError::SessionBusy)
    }

    /// Begin a session for `job`.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::SessionActive` while another job is in
    /// progress and `WorkflowError::InvalidInput` for a delivered job.
    pub async fn start(&self, job: Job) -> Result<()> {
        let mut session = self.lock_session()?;
        if let Some(active) = session.job() {
            return Err(WorkflowError::SessionActive { job_id: active.id });
        }
        if job.status == JobStatus::Delivered {
            return Err(WorkflowError::invalid_input("job")
                .with_reason(format!("job {} is already delivered", job.id)));
        }

        info!("Starting session for job {} ({})", job.id, job.route);
        *session = WorkflowSession::start(job);
        Ok(())
    }

    /// Abandon the active session without saving anything.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::NoActiveSession` when idle.
    pub async fn cancel(&self) -> Result<Job> {
        let mut session = self.lock_session()?;
        let job = session.active_job()?.clone();
        info!("Cancelled session for job {} at step {}", job.id, session.step());
        session.reset();
        Ok(job)
    }

    /// Attach an image to a slot of the current step.
    pub async fn set_photo(&self, slot: PhotoSlot, image: EncodedImage) -> Result<()> {
        self.lock_session()?.set_photo(slot, image)
    }

    pub async fn clear_photo(&self, slot: PhotoSlot) -> Result<Option<EncodedImage>> {
        self.lock_session()?.clear_photo(slot)
    }

    /// Capture a photo for `slot` through the camera, with the blur check.
    ///
    /// Returns `false` when the driver cancels; the slot is left as it was.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Configuration` without a camera and the same
    /// errors as [`Workflow::set_photo`].
    pub async fn capture_photo(&self, slot: PhotoSlot) -> Result<bool> {
        let camera = self.camera.as_ref().ok_or_else(|| WorkflowError::Configuration {
            message: "no camera configured".to_string(),
        })?;

        let mut session = self.lock_session()?;
        session.ensure_current(slot)?;
        let context = CaptureContext {
            job_id: session.active_job()?.id,
            step: session.current_kind(),
        };

        match capture_sharp(&**camera, slot, &context, self.config.blur_threshold).await {
            Some(image) => {
                session.set_photo(slot, image)?;
                Ok(true)
            }
            None => {
                debug!("Capture for {slot} cancelled");
                Ok(false)
            }
        }
    }

    /// Record a typed run-sheet number.
    pub async fn set_run_sheet(&self, raw: &str) -> Result<()> {
        self.lock_session()?.set_run_sheet(raw)
    }

    /// Record the run-sheet number from a scanned code.
    pub async fn scan_run_sheet(&self, payload: &str) -> Result<String> {
        let value = runsheet::from_scan(payload)?;
        let mut session = self.lock_session()?;
        session.set_run_sheet(&value)?;
        Ok(session.run_sheet().to_string())
    }

    pub async fn set_delayed(&self, delayed: bool) -> Result<()> {
        self.lock_session()?.set_delayed(delayed)
    }

    pub async fn select_incident(&self, incident_type: IncidentType) -> Result<()> {
        self.lock_session()?.select_incident(incident_type)
    }

    pub async fn describe_incident(&self, description: &str) -> Result<()> {
        self.lock_session()?.describe_incident(description)
    }

    /// Confirm the current step.
    ///
    /// The step is gated on its photos, the run sheet at pickup and the
    /// incident selection. Once it passes, the session advances and the
    /// step's activity is saved; on completion the delivery record is saved
    /// and added to the history. Save failures do not roll the session back.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::SessionBusy` while another confirmation is
    /// running, `WorkflowError::StepNotReady` when the gate fails, and the
    /// errors of [`WorkflowSession::confirm_and_advance`].
    pub async fn confirm(&self) -> Result<Confirmation> {
        let mut session = self.lock_session()?;
        session.check_ready()?;

        let transition = session
            .confirm_and_advance(self.clock.as_ref(), self.location.as_ref(), &self.config)
            .await?;

        let mut activity_id = None;
        let mut save_errors = Vec::new();

        if let Some(activity) = &transition.activity {
            match self.store.persist_activity(activity).await {
                Ok(id) => activity_id = Some(id),
                Err(e) => {
                    warn!(
                        "Failed to save {} activity for job {}: {e}",
                        activity.step, activity.job_id
                    );
                    self.pending.lock().push(PendingSave::Activity(activity.clone()));
                    save_errors.push(e);
                }
            }
        }

        if let Some(completion) = &transition.completion {
            self.history.lock().push_front(completion.record.clone());
            if let Err(e) = self.store.persist_delivery_record(&completion.record).await {
                warn!(
                    "Failed to save delivery record for job {}: {e}",
                    completion.record.job_id
                );
                self.pending
                    .lock()
                    .push(PendingSave::Delivery(completion.record.clone()));
                save_errors.push(e);
            }
        }

        drop(session);
        Ok(Confirmation {
            transition,
            activity_id,
            save_errors,
        })
    }

    /// Try every queued save once more, in the order they failed.
    ///
    /// Saves that fail again stay queued.
    pub async fn retry_pending(&self) -> RetryReport {
        let queued = std::mem::take(&mut *self.pending.lock());
        let mut report = RetryReport::default();
        let mut still_pending = Vec::new();

        for save in queued {
            let result = match &save {
                PendingSave::Activity(record) => self.store.persist_activity(record).await.map(drop),
                PendingSave::Delivery(record) => self.store.persist_delivery_record(record).await,
            };
            match result {
                Ok(()) => {
                    debug!("Saved queued {}", save.describe());
                    report.saved += 1;
                }
                Err(e) => {
                    warn!("Retry failed for {}: {e}", save.describe());
                    still_pending.push(save);
                    report.errors.push(e);
                }
            }
        }

        // Saves queued by a confirmation during the retry go after the old ones.
        let mut pending = self.pending.lock();
        still_pending.append(&mut pending);
        *pending = still_pending;
        report
    }

    /// Copy of the current session state.
    pub async fn snapshot(&self) -> WorkflowSession {
        self.session.lock().await.clone()
    }

    /// Delivery records completed through this handle, newest first.
    pub fn history(&self) -> Vec<DeliveredJob> {
        self.history.lock().iter().cloned().collect()
    }

    pub fn pending_saves(&self) -> Vec<PendingSave> {
        self.pending.lock().clone()
    }
}
