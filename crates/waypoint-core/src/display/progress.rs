//! The driver's view of the active session.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::{
    models::{PhotoSlot, StepKind},
    workflow::{PendingSave, StepState, WorkflowSession},
};

/// Step list, current-step details and pending saves of a session.
pub struct SessionProgress<'a> {
    pub session: &'a WorkflowSession,
    pub pending: &'a [PendingSave],
}

impl<'a> SessionProgress<'a> {
    pub fn new(session: &'a WorkflowSession, pending: &'a [PendingSave]) -> Self {
        Self { session, pending }
    }

    fn fmt_current(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = self.session;
        let kind = session.current_kind();

        writeln!(f, "### {}", kind.title())?;
        writeln!(f)?;

        for slot in PhotoSlot::for_step(kind) {
            let marker = if session.photos().get(slot).is_some() {
                "✓"
            } else {
                "○"
            };
            writeln!(f, "- {marker} {} `{slot}`", slot.label())?;
        }

        if kind == StepKind::Pickup || !session.run_sheet().is_empty() {
            let run_sheet = match session.run_sheet() {
                "" => "(not set)",
                value => value,
            };
            writeln!(f, "- Run sheet: {run_sheet}")?;
        }

        if kind == StepKind::IncidentSelect || session.is_delayed() {
            let incident = session.incident();
            match (incident.is_delayed(), incident.incident_type()) {
                (false, _) => writeln!(f, "- Delayed: no")?,
                (true, None) => writeln!(f, "- Delayed: yes, incident type not selected")?,
                (true, Some(kind)) => {
                    write!(f, "- Delayed: yes, {}", kind.label())?;
                    if let Some(description) = incident.other_description() {
                        write!(f, " ({description})")?;
                    }
                    writeln!(f)?;
                }
            }
        }

        match session.check_ready() {
            Ok(()) => writeln!(f, "- Ready: {}", kind.action_label()),
            Err(e) => writeln!(f, "- Not ready: {e}"),
        }
    }

    fn fmt_pending(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pending.is_empty() {
            return Ok(());
        }
        writeln!(f)?;
        writeln!(f, "Unsaved records ({}):", self.pending.len())?;
        for save in self.pending {
            writeln!(f, "- {}", save.describe())?;
        }
        Ok(())
    }
}

impl fmt::Display for SessionProgress<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = self.session;
        let Some(job) = session.job() else {
            writeln!(f, "No active job.")?;
            return self.fmt_pending(f);
        };

        writeln!(f, "## Job {}: {}", job.id, job.route)?;
        writeln!(f)?;

        for view in session.step_views() {
            let label = if view.state == StepState::Current {
                format!("**{}**", view.label)
            } else {
                view.label
            };
            writeln!(f, "{}. {} {label} `{}`", view.index + 1, view.state.marker(), view.icon)?;
        }
        writeln!(f)?;

        self.fmt_current(f)?;

        if let Some(address) = session.current_address() {
            write!(f, "- Location: {address}")?;
            if let Some(synced) = session.location_synced_at() {
                write!(f, " (synced {})", LocalDateTime::new(&synced).time_only())?;
            }
            writeln!(f)?;
        }
        if let Some(coordinate) = session.last_coordinate() {
            writeln!(f, "- Position: {coordinate}")?;
        }

        self.fmt_pending(f)
    }
}
