//! In-memory collaborators for tests.

use std::{collections::VecDeque, sync::Arc};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{BlurDecision, Camera, CaptureContext, CapturedFrame, LocationProvider, RecordStore};
use crate::{
    error::{Result, WorkflowError},
    models::{
        ActivityId, ActivityRecord, Coordinate, DeliveredJob, EncodedImage, PhotoSlot,
        ResolvedAddress,
    },
    sharpness::{checkerboard, LumaFrame},
};

pub(crate) fn sharp_frame() -> CapturedFrame {
    CapturedFrame {
        image: EncodedImage::new("image/jpeg", vec![0xAA; 4]),
        preview: Some(checkerboard(8)),
    }
}

pub(crate) fn blurry_frame() -> CapturedFrame {
    CapturedFrame {
        image: EncodedImage::new("image/jpeg", vec![0xBB; 4]),
        preview: Some(LumaFrame::new(8, 8, vec![90; 64]).unwrap()),
    }
}

struct FakeLocationState {
    coordinate: Option<Coordinate>,
    address: Option<String>,
    hang: bool,
    lookups: usize,
}

/// Location provider whose answers can be changed between calls.
#[derive(Clone)]
pub(crate) struct FakeLocation {
    inner: Arc<Mutex<FakeLocationState>>,
}

impl FakeLocation {
    fn with_state(coordinate: Option<Coordinate>, address: Option<&str>, hang: bool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeLocationState {
                coordinate,
                address: address.map(String::from),
                hang,
                lookups: 0,
            })),
        }
    }

    /// Resolves `address` at a fixed position.
    pub(crate) fn at(address: &str) -> Self {
        Self::with_state(Coordinate::new(13.7563, 100.5018).ok(), Some(address), false)
    }

    /// No coordinate, but resolves whatever position it is given.
    pub(crate) fn resolving_only(address: &str) -> Self {
        Self::with_state(None, Some(address), false)
    }

    /// Never answers.
    pub(crate) fn hanging() -> Self {
        Self::with_state(None, None, true)
    }

    pub(crate) fn set_address(&self, address: Option<&str>) {
        self.inner.lock().address = address.map(String::from);
    }

    pub(crate) fn lookups(&self) -> usize {
        self.inner.lock().lookups
    }
}

#[async_trait]
impl LocationProvider for FakeLocation {
    async fn current_coordinate(&self) -> Option<Coordinate> {
        let (hang, coordinate) = {
            let mut state = self.inner.lock();
            state.lookups += 1;
            (state.hang, state.coordinate)
        };
        if hang {
            std::future::pending::<()>().await;
        }
        coordinate
    }

    async fn resolve_address(&self, coordinate: Coordinate, lang: &str) -> Option<ResolvedAddress> {
        let address = self.inner.lock().address.clone()?;
        Some(ResolvedAddress {
            formatted: address,
            lang: lang.to_string(),
            coordinate,
        })
    }
}

struct ScriptedCameraState {
    frames: VecDeque<Option<CapturedFrame>>,
    decisions: VecDeque<BlurDecision>,
    captures: usize,
    reviews: usize,
}

/// Camera that replays scripted frames and blur decisions.
#[derive(Clone)]
pub(crate) struct ScriptedCamera {
    inner: Arc<Mutex<ScriptedCameraState>>,
}

impl ScriptedCamera {
    pub(crate) fn new(frames: Vec<Option<CapturedFrame>>, decisions: Vec<BlurDecision>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ScriptedCameraState {
                frames: frames.into(),
                decisions: decisions.into(),
                captures: 0,
                reviews: 0,
            })),
        }
    }

    pub(crate) fn captures(&self) -> usize {
        self.inner.lock().captures
    }

    pub(crate) fn reviews(&self) -> usize {
        self.inner.lock().reviews
    }
}

#[async_trait]
impl Camera for ScriptedCamera {
    async fn capture(&self, _slot: PhotoSlot, _context: &CaptureContext) -> Option<CapturedFrame> {
        let mut state = self.inner.lock();
        state.captures += 1;
        state.frames.pop_front().flatten()
    }

    async fn review_blurry(&self, _slot: PhotoSlot, _variance: f64) -> BlurDecision {
        let mut state = self.inner.lock();
        state.reviews += 1;
        state.decisions.pop_front().unwrap_or(BlurDecision::Cancel)
    }
}

#[derive(Default)]
struct MemoryStoreState {
    activities: Vec<ActivityRecord>,
    deliveries: Vec<DeliveredJob>,
    fail_activities: bool,
    fail_deliveries: bool,
}

/// Record store kept in memory, with switchable failures.
#[derive(Clone, Default)]
pub(crate) struct MemoryStore {
    inner: Arc<Mutex<MemoryStoreState>>,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn fail_activities(&self, fail: bool) {
        self.inner.lock().fail_activities = fail;
    }

    pub(crate) fn fail_deliveries(&self, fail: bool) {
        self.inner.lock().fail_deliveries = fail;
    }

    pub(crate) fn activities(&self) -> Vec<ActivityRecord> {
        self.inner.lock().activities.clone()
    }

    pub(crate) fn deliveries(&self) -> Vec<DeliveredJob> {
        self.inner.lock().deliveries.clone()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn persist_activity(&self, record: &ActivityRecord) -> Result<ActivityId> {
        let mut state = self.inner.lock();
        if state.fail_activities {
            return Err(WorkflowError::Persistence {
                message: "activity backend unavailable".to_string(),
            });
        }
        state.activities.push(record.clone());
        Ok(ActivityId(state.activities.len() as u64))
    }

    async fn persist_delivery_record(&self, record: &DeliveredJob) -> Result<()> {
        let mut state = self.inner.lock();
        if state.fail_deliveries {
            return Err(WorkflowError::Persistence {
                message: "delivery backend unavailable".to_string(),
            });
        }
        state.deliveries.push(record.clone());
        Ok(())
    }
}
