//! Display implementations for domain models.
//!
//! Enums print their stable identifier; records print markdown sections.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::models::{
    ActivityRecord, DeliveredJob, DeliveryStatus, IncidentType, Job, JobStatus, StepKind,
    TransportType,
};

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for TransportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for IncidentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Job {}: {} ({})", self.id, self.route, self.status.with_icon())?;
        writeln!(f)?;
        writeln!(f, "- **Transport**: {}", self.transport)?;
        writeln!(f, "- **Pickup**: {}", self.pickup_location)?;
        writeln!(f, "- **Scheduled**: {}", LocalDateTime::new(&self.scheduled_at))?;
        if self.status != JobStatus::Assigned {
            writeln!(f, "- **Updated**: {}", LocalDateTime::new(&self.updated_at))?;
        }
        writeln!(f)
    }
}

impl fmt::Display for DeliveredJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let icon = match self.status {
            DeliveryStatus::Success => "✓",
            DeliveryStatus::Delay => "⚠",
            DeliveryStatus::Cancel | DeliveryStatus::Standby => "○",
        };
        writeln!(
            f,
            "## {icon} Job {} · {} ({})",
            self.job_id, self.run_sheet, self.status
        )?;
        writeln!(f)?;
        writeln!(f, "- **Date**: {}", self.date)?;
        writeln!(f, "- **Route**: {} ({})", self.route, self.transport)?;
        writeln!(f, "- **Picked up**: {}", self.pickup_time)?;
        writeln!(f, "- **Delivered**: {}", self.delivery_time)?;

        if let Some(incident) = &self.incident_type {
            write!(f, "- **Incident**: {incident}")?;
            if let Some(time) = &self.incident_time {
                write!(f, " at {time}")?;
            }
            if let Some(address) = &self.incident_address {
                write!(f, ", {address}")?;
            }
            writeln!(f)?;
        }
        writeln!(f)
    }
}

impl fmt::Display for ActivityRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "- **{}** {}", self.step.title(), self.confirmed_at)?;
        if let Some(address) = &self.address {
            write!(f, " at {address}")?;
        }
        if self.step == StepKind::Pickup {
            if let Some(run_sheet) = &self.run_sheet {
                write!(f, " · run sheet {run_sheet}")?;
            }
        }
        if let Some(incident) = &self.incident_type {
            write!(f, " · {incident}")?;
        }
        match self.photos.len() {
            0 => {}
            1 => write!(f, " · 1 photo")?,
            n => write!(f, " · {n} photos")?,
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConfirmedAt;

    fn record(status: DeliveryStatus) -> DeliveredJob {
        DeliveredJob {
            job_id: 4,
            run_sheet: "RS-001".to_string(),
            pickup_time: "2024-03-01 08:30".to_string(),
            delivery_time: "2024-03-01 14:05".to_string(),
            route: "Bangkok DC → Chiang Mai Hub".to_string(),
            transport: TransportType::LongHaul,
            date: "2024-03-01".to_string(),
            status,
            incident_type: None,
            incident_time: None,
            incident_address: None,
        }
    }

    #[test]
    fn test_enum_display_uses_identifiers() {
        assert_eq!(StepKind::IncidentPhotos.to_string(), "incident_photos");
        assert_eq!(JobStatus::Pending.to_string(), "pending");
        assert_eq!(DeliveryStatus::Delay.to_string(), "delay");
        assert_eq!(TransportType::FirstMile.to_string(), "first_mile");
        assert_eq!(IncidentType::VehicleBreakdown.to_string(), "vehicle_breakdown");
    }

    #[test]
    fn test_delivered_job_success() {
        let output = record(DeliveryStatus::Success).to_string();
        assert!(output.starts_with("## ✓ Job 4 · RS-001 (success)"));
        assert!(output.contains("- **Delivered**: 2024-03-01 14:05"));
        assert!(!output.contains("Incident"));
    }

    #[test]
    fn test_delivered_job_with_incident() {
        let mut delayed = record(DeliveryStatus::Delay);
        delayed.incident_type = Some("traffic".to_string());
        delayed.incident_time = Some("2024-03-01 10:12".to_string());
        delayed.incident_address = Some("Km 112, Highway 1".to_string());

        let output = delayed.to_string();
        assert!(output.contains("⚠ Job 4"));
        assert!(output.contains("- **Incident**: traffic at 2024-03-01 10:12, Km 112, Highway 1"));
    }

    #[test]
    fn test_activity_line() {
        let activity = ActivityRecord {
            job_id: 4,
            step: StepKind::Pickup,
            confirmed_at: ConfirmedAt {
                date: "2024-03-01".to_string(),
                time: "08:30".to_string(),
                instant: "2024-03-01T08:30:00Z".parse().unwrap(),
            },
            address: Some("Bangkok DC".to_string()),
            run_sheet: Some("RS-001".to_string()),
            incident_type: None,
            photos: Vec::new(),
        };
        assert_eq!(
            activity.to_string(),
            "- **Pickup** 2024-03-01 08:30 at Bangkok DC · run sheet RS-001\n"
        );
    }
}
