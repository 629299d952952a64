//! Step sequences for the two branches.

use crate::models::StepKind;

const NORMAL: [StepKind; 6] = [
    StepKind::CheckIn,
    StepKind::Pickup,
    StepKind::Departure,
    StepKind::IncidentSelect,
    StepKind::Arrival,
    StepKind::Delivery,
];

const DELAYED: [StepKind; 7] = [
    StepKind::CheckIn,
    StepKind::Pickup,
    StepKind::Departure,
    StepKind::IncidentSelect,
    StepKind::IncidentPhotos,
    StepKind::Arrival,
    StepKind::Delivery,
];

/// Position of the incident-selection step, the only branch point.
pub const INCIDENT_SELECT_INDEX: usize = 3;

/// Ordered steps of the branch selected by `delayed`.
///
/// # Examples
///
/// ```rust
/// use waypoint_core::{models::StepKind, workflow::step_sequence};
///
/// assert_eq!(step_sequence(false).len(), 6);
/// assert_eq!(step_sequence(true)[4], StepKind::IncidentPhotos);
/// assert_eq!(step_sequence(false)[4], StepKind::Arrival);
/// ```
pub fn step_sequence(delayed: bool) -> &'static [StepKind] {
    if delayed {
        &DELAYED
    } else {
        &NORMAL
    }
}

/// Index of the terminal step of the branch.
pub fn max_step(delayed: bool) -> usize {
    step_sequence(delayed).len() - 1
}

/// Step names of the branch, in order.
pub fn step_names(delayed: bool) -> Vec<&'static str> {
    step_sequence(delayed).iter().map(|kind| kind.title()).collect()
}
