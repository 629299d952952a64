//! Photo capture with the blur check.

use log::{debug, info};

use super::Camera;
use crate::{
    models::{EncodedImage, PhotoSlot, StepKind},
    sharpness::{assess, LumaFrame},
};

/// What the camera needs to know about the capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureContext {
    pub job_id: u64,
    pub step: StepKind,
}

/// A frame returned by the camera.
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    /// The encoded photo to keep
    pub image: EncodedImage,

    /// Grayscale preview for the sharpness check; frames without one are
    /// accepted unchecked
    pub preview: Option<LumaFrame>,
}

/// Driver's answer to a blurry capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlurDecision {
    /// Keep the blurry frame
    Accept,
    /// Capture again
    Retake,
    /// Abandon the capture
    Cancel,
}

/// Capture a frame, re-prompting while it is blurry.
///
/// Returns `None` when the driver cancels at any point.
pub async fn capture_sharp(
    camera: &dyn Camera,
    slot: PhotoSlot,
    context: &CaptureContext,
    threshold: f64,
) -> Option<EncodedImage> {
    loop {
        let frame = camera.capture(slot, context).await?;
        let Some(preview) = &frame.preview else {
            return Some(frame.image);
        };

        let report = assess(preview, threshold);
        if !report.is_blurry() {
            return Some(frame.image);
        }

        match camera.review_blurry(slot, report.variance).await {
            BlurDecision::Accept => {
                info!(
                    "Accepted blurry photo for {slot} (variance {:.1} < {:.1})",
                    report.variance, report.threshold
                );
                return Some(frame.image);
            }
            BlurDecision::Retake => {
                debug!("Retaking blurry photo for {slot}");
            }
            BlurDecision::Cancel => return None,
        }
    }
}
