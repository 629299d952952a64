//! Live state of one job traversal.

use jiff::Timestamp;

use super::sequence::{max_step, step_sequence, INCIDENT_SELECT_INDEX};
use crate::{
    error::{Result, WorkflowError},
    models::{
        ActivityPhoto, CheckInSlot, ConfirmedAt, Coordinate, DeliverySlot, EncodedImage,
        IncidentSelection, IncidentSlot, IncidentType, Job, PhotoSet, PhotoSlot, PickupSlot,
        SlotKind, StepKind,
    },
    runsheet,
};

/// Confirmation timestamps, one per timestamped step.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfirmedTimes {
    pub check_in: Option<ConfirmedAt>,
    pub pickup: Option<ConfirmedAt>,
    pub departure: Option<ConfirmedAt>,
    pub incident: Option<ConfirmedAt>,
    pub arrival: Option<ConfirmedAt>,
    pub delivery: Option<ConfirmedAt>,
}

impl ConfirmedTimes {
    pub const fn new() -> Self {
        Self {
            check_in: None,
            pickup: None,
            departure: None,
            incident: None,
            arrival: None,
            delivery: None,
        }
    }

    /// Timestamp recorded for a step, if any.
    pub fn get(&self, kind: StepKind) -> Option<&ConfirmedAt> {
        match kind {
            StepKind::CheckIn => self.check_in.as_ref(),
            StepKind::Pickup => self.pickup.as_ref(),
            StepKind::Departure => self.departure.as_ref(),
            StepKind::IncidentSelect => None,
            StepKind::IncidentPhotos => self.incident.as_ref(),
            StepKind::Arrival => self.arrival.as_ref(),
            StepKind::Delivery => self.delivery.as_ref(),
        }
    }

    /// Record the confirmation of `kind`. Steps without a timestamp are
    /// ignored.
    pub(crate) fn stamp(&mut self, kind: StepKind, at: ConfirmedAt) {
        let field = match kind {
            StepKind::CheckIn => &mut self.check_in,
            StepKind::Pickup => &mut self.pickup,
            StepKind::Departure => &mut self.departure,
            StepKind::IncidentSelect => return,
            StepKind::IncidentPhotos => &mut self.incident,
            StepKind::Arrival => &mut self.arrival,
            StepKind::Delivery => &mut self.delivery,
        };
        *field = Some(at);
    }

    /// Number of recorded timestamps.
    pub fn count(&self) -> usize {
        [
            &self.check_in,
            &self.pickup,
            &self.departure,
            &self.incident,
            &self.arrival,
            &self.delivery,
        ]
        .iter()
        .filter(|at| at.is_some())
        .count()
    }
}

/// Photo sets of every photographed step.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionPhotos {
    pub check_in: PhotoSet<CheckInSlot>,
    pub pickup: PhotoSet<PickupSlot>,
    pub incident: PhotoSet<IncidentSlot>,
    pub delivery: PhotoSet<DeliverySlot>,
}

fn manifest<S: SlotKind>(
    set: &PhotoSet<S>,
    wrap: impl Fn(S) -> PhotoSlot,
) -> Vec<ActivityPhoto> {
    set.iter()
        .map(|(slot, image)| ActivityPhoto {
            slot: wrap(slot),
            image: image.clone(),
        })
        .collect()
}

impl SessionPhotos {
    pub const fn new() -> Self {
        Self {
            check_in: PhotoSet::new(),
            pickup: PhotoSet::new(),
            incident: PhotoSet::new(),
            delivery: PhotoSet::new(),
        }
    }

    pub fn get(&self, slot: PhotoSlot) -> Option<&EncodedImage> {
        match slot {
            PhotoSlot::CheckIn(slot) => self.check_in.get(slot),
            PhotoSlot::Pickup(slot) => self.pickup.get(slot),
            PhotoSlot::Incident(slot) => self.incident.get(slot),
            PhotoSlot::Delivery(slot) => self.delivery.get(slot),
        }
    }

    pub(crate) fn set(&mut self, slot: PhotoSlot, image: EncodedImage) -> Option<EncodedImage> {
        match slot {
            PhotoSlot::CheckIn(slot) => self.check_in.set(slot, image),
            PhotoSlot::Pickup(slot) => self.pickup.set(slot, image),
            PhotoSlot::Incident(slot) => self.incident.set(slot, image),
            PhotoSlot::Delivery(slot) => self.delivery.set(slot, image),
        }
    }

    pub(crate) fn clear(&mut self, slot: PhotoSlot) -> Option<EncodedImage> {
        match slot {
            PhotoSlot::CheckIn(slot) => self.check_in.clear(slot),
            PhotoSlot::Pickup(slot) => self.pickup.clear(slot),
            PhotoSlot::Incident(slot) => self.incident.clear(slot),
            PhotoSlot::Delivery(slot) => self.delivery.clear(slot),
        }
    }

    /// Whether every slot owned by `kind` is filled. Steps without photos
    /// are always complete.
    pub fn is_complete(&self, kind: StepKind) -> bool {
        match kind {
            StepKind::CheckIn => self.check_in.is_complete(),
            StepKind::Pickup => self.pickup.is_complete(),
            StepKind::IncidentPhotos => self.incident.is_complete(),
            StepKind::Delivery => self.delivery.is_complete(),
            StepKind::Departure | StepKind::IncidentSelect | StepKind::Arrival => true,
        }
    }

    /// Slots of `kind` still waiting for a capture.
    pub fn missing(&self, kind: StepKind) -> Vec<PhotoSlot> {
        PhotoSlot::for_step(kind)
            .into_iter()
            .filter(|slot| self.get(*slot).is_none())
            .collect()
    }

    /// Captured photos of `kind`, for the activity record.
    pub fn manifest(&self, kind: StepKind) -> Vec<ActivityPhoto> {
        match kind {
            StepKind::CheckIn => manifest(&self.check_in, PhotoSlot::CheckIn),
            StepKind::Pickup => manifest(&self.pickup, PhotoSlot::Pickup),
            StepKind::IncidentPhotos => manifest(&self.incident, PhotoSlot::Incident),
            StepKind::Delivery => manifest(&self.delivery, PhotoSlot::Delivery),
            StepKind::Departure | StepKind::IncidentSelect | StepKind::Arrival => Vec::new(),
        }
    }
}

/// Most recent position known to the session.
///
/// The coordinate doubles as the fallback when a later fetch fails.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LocationState {
    pub coordinate: Option<Coordinate>,
    pub address: Option<String>,
    pub synced_at: Option<Timestamp>,
}

impl LocationState {
    pub const fn new() -> Self {
        Self {
            coordinate: None,
            address: None,
            synced_at: None,
        }
    }
}

/// State of the active job traversal.
///
/// Mutations go through validated setters and the transition engine; the
/// cursor only moves through [`WorkflowSession::confirm_and_advance`].
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowSession {
    pub(crate) job: Option<Job>,
    pub(crate) step: usize,
    pub(crate) incident: IncidentSelection,
    pub(crate) times: ConfirmedTimes,
    pub(crate) photos: SessionPhotos,
    pub(crate) run_sheet: String,
    pub(crate) location: LocationState,
    pub(crate) incident_address: Option<String>,
}

impl WorkflowSession {
    /// The state before a job is started and after it completes or is
    /// cancelled.
    pub const INITIAL: Self = Self {
        job: None,
        step: 0,
        incident: IncidentSelection::new(),
        times: ConfirmedTimes::new(),
        photos: SessionPhotos::new(),
        run_sheet: String::new(),
        location: LocationState::new(),
        incident_address: None,
    };

    /// A fresh session for `job`.
    pub fn start(job: Job) -> Self {
        Self {
            job: Some(job),
            ..Self::INITIAL
        }
    }

    /// Return to [`Self::INITIAL`].
    pub fn reset(&mut self) {
        *self = Self::INITIAL;
    }

    pub fn job(&self) -> Option<&Job> {
        self.job.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.job.is_some()
    }

    /// Cursor into the active step sequence.
    pub fn step(&self) -> usize {
        self.step
    }

    pub fn is_delayed(&self) -> bool {
        self.incident.is_delayed()
    }

    pub fn incident(&self) -> &IncidentSelection {
        &self.incident
    }

    pub fn times(&self) -> &ConfirmedTimes {
        &self.times
    }

    pub fn photos(&self) -> &SessionPhotos {
        &self.photos
    }

    pub fn run_sheet(&self) -> &str {
        &self.run_sheet
    }

    pub fn current_address(&self) -> Option<&str> {
        self.location.address.as_deref()
    }

    pub fn location_synced_at(&self) -> Option<Timestamp> {
        self.location.synced_at
    }

    pub fn last_coordinate(&self) -> Option<Coordinate> {
        self.location.coordinate
    }

    pub fn incident_address(&self) -> Option<&str> {
        self.incident_address.as_deref()
    }

    /// Steps of the active branch.
    pub fn sequence(&self) -> &'static [StepKind] {
        step_sequence(self.is_delayed())
    }

    /// Index of the terminal step of the active branch.
    pub fn max_step(&self) -> usize {
        max_step(self.is_delayed())
    }

    /// Step at `index` in the active branch.
    pub fn kind_at(&self, index: usize) -> Option<StepKind> {
        self.sequence().get(index).copied()
    }

    /// Step under the cursor.
    pub fn current_kind(&self) -> StepKind {
        self.sequence()[self.step]
    }

    /// Whether the branch can no longer change.
    pub fn is_delay_locked(&self) -> bool {
        self.step > INCIDENT_SELECT_INDEX
    }

    pub(crate) fn active_job(&self) -> Result<&Job> {
        self.job.as_ref().ok_or(WorkflowError::NoActiveSession)
    }

    pub(crate) fn ensure_current(&self, slot: PhotoSlot) -> Result<()> {
        self.active_job()?;
        let current = self.current_kind();
        if slot.owner() != current {
            return Err(WorkflowError::SlotNotActive {
                slot: slot.to_string(),
                owner: slot.owner(),
                current,
            });
        }
        Ok(())
    }

    /// Store a photo for a slot of the current step.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::SlotNotActive` when the slot belongs to
    /// another step, `WorkflowError::NoActiveSession` without a job.
    pub fn set_photo(&mut self, slot: PhotoSlot, image: EncodedImage) -> Result<()> {
        self.ensure_current(slot)?;
        if image.is_empty() {
            return Err(WorkflowError::invalid_input(slot.to_string())
                .with_reason("captured image is empty"));
        }
        self.photos.set(slot, image);
        Ok(())
    }

    /// Empty a slot of the current step.
    ///
    /// # Errors
    ///
    /// Same as [`Self::set_photo`].
    pub fn clear_photo(&mut self, slot: PhotoSlot) -> Result<Option<EncodedImage>> {
        self.ensure_current(slot)?;
        Ok(self.photos.clear(slot))
    }

    /// Record the run-sheet number, normalised.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::InvalidInput` for an empty value or once
    /// pickup has been confirmed.
    pub fn set_run_sheet(&mut self, raw: &str) -> Result<()> {
        self.active_job()?;
        if self.times.pickup.is_some() {
            return Err(WorkflowError::invalid_input("run_sheet")
                .with_reason("run sheet is fixed once pickup is confirmed"));
        }
        self.run_sheet = runsheet::normalize(raw)?;
        Ok(())
    }

    fn ensure_incident_select(&self) -> Result<()> {
        self.active_job()?;
        let current = self.current_kind();
        if current != StepKind::IncidentSelect {
            return Err(WorkflowError::DelayLocked { step: current });
        }
        Ok(())
    }

    /// Toggle the delayed gate. Turning it off clears the incident fields.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::DelayLocked` outside the incident-selection
    /// step.
    pub fn set_delayed(&mut self, delayed: bool) -> Result<()> {
        self.ensure_incident_select()?;
        self.incident.set_delayed(delayed);
        Ok(())
    }

    /// Select the incident type for a delayed trip.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::DelayLocked` outside the incident-selection
    /// step, `WorkflowError::InvalidInput` when the gate is off.
    pub fn select_incident(&mut self, incident_type: IncidentType) -> Result<()> {
        self.ensure_incident_select()?;
        self.incident.select(incident_type)
    }

    /// Describe an `other` incident.
    ///
    /// # Errors
    ///
    /// Same as [`Self::select_incident`], and `WorkflowError::InvalidInput`
    /// unless the type is `other`.
    pub fn describe_incident(&mut self, description: &str) -> Result<()> {
        self.ensure_incident_select()?;
        self.incident.describe_other(description)
    }

    /// Check that the current step has everything it needs to be confirmed.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::StepNotReady` naming what is missing.
    pub fn check_ready(&self) -> Result<()> {
        self.active_job()?;
        let kind = self.current_kind();

        let missing = self.photos.missing(kind);
        if !missing.is_empty() {
            let slots = missing
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(WorkflowError::not_ready(kind, format!("missing photos: {slots}")));
        }

        match kind {
            StepKind::Pickup if self.run_sheet.is_empty() => {
                Err(WorkflowError::not_ready(kind, "run sheet number is required"))
            }
            StepKind::IncidentSelect if !self.incident.is_complete() => Err(
                WorkflowError::not_ready(kind, "select the incident type for a delayed trip"),
            ),
            _ => Ok(()),
        }
    }

    /// Whether the confirm control should be enabled.
    pub fn is_ready(&self) -> bool {
        self.check_ready().is_ok()
    }
}

impl Default for WorkflowSession {
    fn default() -> Self {
        Self::INITIAL
    }
}
