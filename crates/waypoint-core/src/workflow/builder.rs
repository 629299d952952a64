//! Builder for creating and configuring Workflow instances.

use std::{collections::VecDeque, sync::Arc};

use parking_lot::Mutex;

use super::{Workflow, WorkflowSession};
use crate::{
    config::WorkflowConfig,
    error::Result,
    services::{Camera, Clock, LocationProvider, NoLocation, RecordStore, SystemClock},
};

/// Builder for creating and configuring Workflow instances.
///
/// Only the record store is required. The clock defaults to the system
/// clock, location to a provider that never resolves, and the camera is
/// optional: without one, photos can only be attached directly.
pub struct WorkflowBuilder {
    store: Arc<dyn RecordStore>,
    clock: Option<Arc<dyn Clock>>,
    location: Option<Arc<dyn LocationProvider>>,
    camera: Option<Arc<dyn Camera>>,
    config: WorkflowConfig,
}

impl WorkflowBuilder {
    /// Creates a new builder persisting to `store`.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            clock: None,
            location: None,
            camera: None,
            config: WorkflowConfig::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn with_location(mut self, location: Arc<dyn LocationProvider>) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_camera(mut self, camera: Arc<dyn Camera>) -> Self {
        self.camera = Some(camera);
        self
    }

    pub fn with_config(mut self, config: WorkflowConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the configured workflow with an idle session.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Configuration` if the configuration is invalid
    pub fn build(self) -> Result<Workflow> {
        self.config.validate()?;

        Ok(Workflow {
            session: Arc::new(tokio::sync::Mutex::new(WorkflowSession::INITIAL)),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            location: self.location.unwrap_or_else(|| Arc::new(NoLocation)),
            camera: self.camera,
            store: self.store,
            config: self.config,
            pending: Mutex::new(Vec::new()),
            history: Mutex::new(VecDeque::new()),
        })
    }
}
