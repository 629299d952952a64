//! Result wrapper types for displaying operation outcomes.

use std::fmt;

use crate::{models::Job, workflow::Confirmation};

/// Wrapper type for displaying the result of create operations.
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for CreateResult<Job> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Assigned job with ID: {}", self.resource.id)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// What a confirmation did, including saves that failed.
pub struct ConfirmResult<'a>(pub &'a Confirmation);

impl fmt::Display for ConfirmResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let transition = &self.0.transition;

        match (&transition.completion, &transition.confirmed_at) {
            (Some(completion), _) => {
                writeln!(
                    f,
                    "Job {} delivered ({})",
                    completion.record.job_id, completion.record.status
                )?;
                writeln!(f)?;
                write!(f, "{}", completion.record)?;
            }
            (None, Some(at)) => {
                write!(f, "Confirmed {} at {at}", transition.step.title())?;
                if let Some(id) = self.0.activity_id {
                    write!(f, " (activity {id})")?;
                }
                writeln!(f)?;
            }
            (None, None) => writeln!(f, "Incident status reported")?,
        }

        for error in &self.0.save_errors {
            writeln!(f)?;
            writeln!(f, "⚠ Not saved: {error}. Run `retry` to try again.")?;
        }
        Ok(())
    }
}
