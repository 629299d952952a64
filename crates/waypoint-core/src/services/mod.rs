//! Collaborator contracts consumed by the workflow.
//!
//! The workflow never talks to a device, a geocoder or a backend directly.
//! Each concern is a trait injected when the workflow is built:
//!
//! - [`Clock`]: confirmation timestamps
//! - [`LocationProvider`]: device coordinate and reverse geocoding
//! - [`Camera`]: interactive photo capture
//! - [`RecordStore`]: durable storage for activities and delivery records
//!
//! Location and camera calls are best-effort and report failure as `None`.
//! Store calls return errors that the workflow surfaces without retrying.

use async_trait::async_trait;

use crate::{
    error::Result,
    models::{
        ActivityId, ActivityRecord, ConfirmedAt, Coordinate, DeliveredJob, PhotoSlot,
        ResolvedAddress,
    },
};

pub mod camera;
pub mod clock;
pub mod location;

#[cfg(test)]
pub(crate) mod fakes;

pub use camera::{capture_sharp, BlurDecision, CaptureContext, CapturedFrame};
pub use clock::{FixedClock, SystemClock};
pub use location::{locate, LocationFix, NoLocation, StaticLocation};

/// Source of confirmation timestamps.
pub trait Clock: Send + Sync {
    /// Snapshot the current local date and time.
    fn now(&self) -> ConfirmedAt;
}

/// Device location and reverse geocoding.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Best-effort current position; `None` when unavailable.
    async fn current_coordinate(&self) -> Option<Coordinate>;

    /// Resolve a position to an address; `None` on failure.
    async fn resolve_address(&self, coordinate: Coordinate, lang: &str)
        -> Option<ResolvedAddress>;
}

/// Interactive camera.
#[async_trait]
pub trait Camera: Send + Sync {
    /// Capture one frame for a slot; `None` when the driver cancels.
    async fn capture(&self, slot: PhotoSlot, context: &CaptureContext) -> Option<CapturedFrame>;

    /// Ask the driver what to do with a frame flagged as blurry.
    async fn review_blurry(&self, slot: PhotoSlot, variance: f64) -> BlurDecision;
}

/// Durable storage for workflow output.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Save the record of one confirmed step.
    async fn persist_activity(&self, record: &ActivityRecord) -> Result<ActivityId>;

    /// Save a completed delivery and mark its job delivered.
    async fn persist_delivery_record(&self, record: &DeliveredJob) -> Result<()>;
}
