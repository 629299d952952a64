//! Incident types and the incident-selection sub-state.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WorkflowError};

/// Closed list of incidents a driver can report.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IncidentType {
    Traffic,
    Accident,
    VehicleBreakdown,
    Weather,
    CustomerUnavailable,
    /// Free-text description applies
    Other,
}

impl IncidentType {
    pub const ALL: [IncidentType; 6] = [
        IncidentType::Traffic,
        IncidentType::Accident,
        IncidentType::VehicleBreakdown,
        IncidentType::Weather,
        IncidentType::CustomerUnavailable,
        IncidentType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentType::Traffic => "traffic",
            IncidentType::Accident => "accident",
            IncidentType::VehicleBreakdown => "vehicle_breakdown",
            IncidentType::Weather => "weather",
            IncidentType::CustomerUnavailable => "customer_unavailable",
            IncidentType::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IncidentType::Traffic => "Traffic",
            IncidentType::Accident => "Accident",
            IncidentType::VehicleBreakdown => "Vehicle breakdown",
            IncidentType::Weather => "Weather",
            IncidentType::CustomerUnavailable => "Customer unavailable",
            IncidentType::Other => "Other",
        }
    }
}

impl FromStr for IncidentType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        IncidentType::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| format!("Invalid incident type: {s}"))
    }
}

/// Delayed gate with its dependent incident fields.
///
/// The type and description only exist while the gate is on; turning it off
/// drops both so they cannot resurface when the gate is turned back on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IncidentSelection {
    delayed: bool,
    incident_type: Option<IncidentType>,
    other_description: Option<String>,
}

impl IncidentSelection {
    pub const fn new() -> Self {
        Self {
            delayed: false,
            incident_type: None,
            other_description: None,
        }
    }

    pub fn is_delayed(&self) -> bool {
        self.delayed
    }

    pub fn incident_type(&self) -> Option<IncidentType> {
        self.incident_type
    }

    pub fn other_description(&self) -> Option<&str> {
        self.other_description.as_deref()
    }

    pub fn set_delayed(&mut self, delayed: bool) {
        self.delayed = delayed;
        if !delayed {
            self.incident_type = None;
            self.other_description = None;
        }
    }

    /// Choose the incident type.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::InvalidInput` when the gate is off.
    pub fn select(&mut self, incident_type: IncidentType) -> Result<()> {
        if !self.delayed {
            return Err(WorkflowError::invalid_input("incident_type")
                .with_reason("an incident can only be selected for a delayed trip"));
        }
        self.incident_type = Some(incident_type);
        if incident_type != IncidentType::Other {
            self.other_description = None;
        }
        Ok(())
    }

    /// Set the free-text description for an `other` incident.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::InvalidInput` unless the selected type is
    /// [`IncidentType::Other`].
    pub fn describe_other(&mut self, description: &str) -> Result<()> {
        if self.incident_type != Some(IncidentType::Other) {
            return Err(WorkflowError::invalid_input("incident_description")
                .with_reason("a description only applies to an 'other' incident"));
        }
        let trimmed = description.trim();
        self.other_description = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        Ok(())
    }

    /// Whether the selection step may be confirmed.
    pub fn is_complete(&self) -> bool {
        !self.delayed || self.incident_type.is_some()
    }

    /// Label carried into the delivery record.
    pub fn record_label(&self) -> Option<String> {
        if !self.delayed {
            return None;
        }
        match (self.incident_type, &self.other_description) {
            (Some(IncidentType::Other), Some(description)) => Some(description.clone()),
            (Some(kind), _) => Some(kind.as_str().to_string()),
            (None, _) => None,
        }
    }
}
