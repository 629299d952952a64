//! Collection wrapper types for displaying groups of domain objects.

use std::fmt;

use crate::models::{ActivityRecord, DeliveredJob, Job};

/// Newtype wrapper for displaying a list of jobs.
///
/// # Examples
///
/// ```rust
/// use jiff::Timestamp;
/// use waypoint_core::{
///     display::Jobs,
///     models::{Job, JobStatus, TransportType},
/// };
///
/// let now = Timestamp::now();
/// let jobs = Jobs(vec![Job {
///     id: 1,
///     transport: TransportType::FirstMile,
///     route: "Lat Krabang → Bangna DC".to_string(),
///     pickup_location: "Lat Krabang".to_string(),
///     status: JobStatus::Assigned,
///     scheduled_at: now,
///     created_at: now,
///     updated_at: now,
/// }]);
/// assert!(jobs.to_string().contains("## Job 1: Lat Krabang → Bangna DC (○ Assigned)"));
/// assert_eq!(Jobs(vec![]).to_string(), "No jobs found.\n");
/// ```
pub struct Jobs(pub Vec<Job>);

impl Jobs {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Job> {
        self.0.iter()
    }
}

impl fmt::Display for Jobs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No jobs found.");
        }
        for job in &self.0 {
            write!(f, "{job}")?;
        }
        Ok(())
    }
}

/// Completed deliveries, newest first.
pub struct History(pub Vec<DeliveredJob>);

impl History {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for History {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No deliveries recorded.");
        }
        for record in &self.0 {
            write!(f, "{record}")?;
        }
        Ok(())
    }
}

/// Confirmed steps of one job, as a bullet list.
pub struct Activities(pub Vec<ActivityRecord>);

impl fmt::Display for Activities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No confirmed steps.");
        }
        for activity in &self.0 {
            write!(f, "{activity}")?;
        }
        Ok(())
    }
}
