//! Per-step activity records handed to persistence.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ConfirmedAt, EncodedImage, PhotoSlot, StepKind};

/// Identifier assigned by the store to a saved activity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ActivityId(pub u64);

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A photo attached to an activity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityPhoto {
    pub slot: PhotoSlot,
    pub image: EncodedImage,
}

/// What the driver confirmed at one timestamped step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityRecord {
    /// Job the session belongs to
    pub job_id: u64,

    /// Confirmed step
    pub step: StepKind,

    /// When the step was confirmed
    pub confirmed_at: ConfirmedAt,

    /// Address known right after the confirmation
    pub address: Option<String>,

    /// Run-sheet number, once captured
    pub run_sheet: Option<String>,

    /// Incident label, on the incident-photo step
    pub incident_type: Option<String>,

    /// Photos of the step's slots
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<ActivityPhoto>,
}
