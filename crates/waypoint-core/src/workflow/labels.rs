//! Step titles, labels and icons.

use super::WorkflowSession;
use crate::models::StepKind;

impl StepKind {
    /// Short name shown in the step list.
    pub fn title(&self) -> &'static str {
        match self {
            StepKind::CheckIn => "Check-in",
            StepKind::Pickup => "Pickup",
            StepKind::Departure => "Departure",
            StepKind::IncidentSelect => "Incident",
            StepKind::IncidentPhotos => "Incident photos",
            StepKind::Arrival => "Arrival",
            StepKind::Delivery => "Delivery (POD)",
        }
    }

    /// Forward-looking label on the confirm control.
    pub fn action_label(&self) -> &'static str {
        match self {
            StepKind::CheckIn => "Confirm check-in",
            StepKind::Pickup => "Confirm pickup",
            StepKind::Departure => "Confirm departure",
            StepKind::IncidentSelect => "Report incident status",
            StepKind::IncidentPhotos => "Confirm incident photos",
            StepKind::Arrival => "Confirm arrival",
            StepKind::Delivery => "Confirm delivery",
        }
    }

    /// Glyph identifier for the step.
    pub fn icon(&self) -> &'static str {
        match self {
            StepKind::CheckIn => "clipboard-check",
            StepKind::Pickup => "package",
            StepKind::Departure => "truck",
            StepKind::IncidentSelect => "alert-triangle",
            StepKind::IncidentPhotos => "camera",
            StepKind::Arrival => "map-pin",
            StepKind::Delivery => "check-circle",
        }
    }

    fn summary_verb(&self) -> &'static str {
        match self {
            StepKind::CheckIn => "Checked in",
            StepKind::Pickup => "Picked up",
            StepKind::Departure => "Departed",
            StepKind::IncidentSelect => "Incident status reported",
            StepKind::IncidentPhotos => "Incident reported",
            StepKind::Arrival => "Arrived",
            StepKind::Delivery => "Delivered",
        }
    }
}

/// Where a step stands relative to the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    Done,
    Current,
    Upcoming,
}

impl StepState {
    pub fn marker(&self) -> &'static str {
        match self {
            StepState::Done => "✓",
            StepState::Current => "➤",
            StepState::Upcoming => "○",
        }
    }
}

/// One row of the step list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepView {
    pub index: usize,
    pub kind: StepKind,
    pub label: String,
    pub icon: &'static str,
    pub state: StepState,
}

impl WorkflowSession {
    /// Label for the step at `index` in the active branch.
    ///
    /// Steps behind the cursor that carry a timestamp get a summary of the
    /// confirmation; everything else gets the forward-looking label.
    pub fn step_label(&self, index: usize) -> Option<String> {
        let kind = self.kind_at(index)?;
        let confirmed = if index < self.step {
            self.times.get(kind)
        } else {
            None
        };

        let label = match (kind, confirmed) {
            (StepKind::Pickup, Some(at)) => {
                format!("{} {} · run sheet {}", kind.summary_verb(), at, self.run_sheet)
            }
            (_, Some(at)) => format!("{} {}", kind.summary_verb(), at),
            (_, None) => kind.action_label().to_string(),
        };
        Some(label)
    }

    /// Icon for the step at `index` in the active branch.
    pub fn step_icon(&self, index: usize) -> Option<&'static str> {
        self.kind_at(index).map(|kind| kind.icon())
    }

    /// Rows for every step of the active branch.
    pub fn step_views(&self) -> Vec<StepView> {
        self.sequence()
            .iter()
            .enumerate()
            .map(|(index, kind)| StepView {
                index,
                kind: *kind,
                label: self.step_label(index).unwrap_or_default(),
                icon: kind.icon(),
                state: match index.cmp(&self.step) {
                    std::cmp::Ordering::Less => StepState::Done,
                    std::cmp::Ordering::Equal => StepState::Current,
                    std::cmp::Ordering::Greater => StepState::Upcoming,
                },
            })
            .collect()
    }
}
