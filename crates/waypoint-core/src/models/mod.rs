//! Data models for jobs, workflow steps and delivery records.
//!
//! Display implementations for these models live in
//! [`crate::display::models`], keeping the data structures free of
//! presentation logic.
//!
//! # Examples
//!
//! ```rust
//! use waypoint_core::models::{PhotoSlot, PickupSlot, StepKind};
//!
//! let slot: PhotoSlot = "pickup.seal".parse().unwrap();
//! assert_eq!(slot, PhotoSlot::Pickup(PickupSlot::Seal));
//! assert_eq!(slot.owner(), StepKind::Pickup);
//! assert_eq!(slot.to_string(), "pickup.seal");
//! ```

pub mod activity;
pub mod delivered;
pub mod incident;
pub mod job;
pub mod location;
pub mod photo;
pub mod status;
pub mod step;
pub mod timestamp;


pub use activity::{ActivityId, ActivityPhoto, ActivityRecord};
pub use delivered::DeliveredJob;
pub use incident::{IncidentSelection, IncidentType};
pub use job::{Job, TransportType};
pub use location::{Coordinate, ResolvedAddress};
pub use photo::{
    CheckInSlot, DeliverySlot, EncodedImage, IncidentSlot, PhotoSet, PhotoSlot, PickupSlot,
    SlotKind,
};
pub use status::{DeliveryStatus, JobStatus};
pub use step::StepKind;
pub use timestamp::ConfirmedAt;
