//! Workflow step kinds.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One checkpoint of the driver workflow.
///
/// Positions in the active sequence are derived from the delayed flag; code
/// that needs to know what a position means switches on the kind found there.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Driver reports at the pickup site
    CheckIn,
    /// Goods loaded and sealed, run sheet captured
    Pickup,
    /// Vehicle leaves the pickup site
    Departure,
    /// Driver declares whether the trip is delayed
    IncidentSelect,
    /// Photos of the incident (delayed branch only)
    IncidentPhotos,
    /// Vehicle reaches the destination
    Arrival,
    /// Proof of delivery
    Delivery,
}

impl StepKind {
    /// Stable identifier used in storage and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::CheckIn => "check_in",
            StepKind::Pickup => "pickup",
            StepKind::Departure => "departure",
            StepKind::IncidentSelect => "incident_select",
            StepKind::IncidentPhotos => "incident_photos",
            StepKind::Arrival => "arrival",
            StepKind::Delivery => "delivery",
        }
    }

    /// Whether confirming this step records a timestamp.
    pub fn is_timestamped(&self) -> bool {
        !matches!(self, StepKind::IncidentSelect)
    }
}

impl FromStr for StepKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "check_in" | "checkin" => Ok(StepKind::CheckIn),
            "pickup" => Ok(StepKind::Pickup),
            "departure" => Ok(StepKind::Departure),
            "incident_select" | "incident" => Ok(StepKind::IncidentSelect),
            "incident_photos" => Ok(StepKind::IncidentPhotos),
            "arrival" => Ok(StepKind::Arrival),
            "delivery" | "pod" => Ok(StepKind::Delivery),
            _ => Err(format!("Invalid step: {s}")),
        }
    }
}
