//! Runtime configuration for a workflow.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WorkflowError};

/// Default bound on each location call.
pub const DEFAULT_LOCATION_TIMEOUT: Duration = Duration::from_secs(20);

/// Default Laplacian variance below which a capture is treated as blurry.
pub const DEFAULT_BLUR_THRESHOLD: f64 = 100.0;

/// Tunables shared by the workflow and its collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Bound applied separately to coordinate fetch and address resolution,
    /// in seconds
    pub location_timeout_secs: u64,

    /// Language passed to reverse geocoding
    pub lang: String,

    /// Sharpness threshold for captured photos
    pub blur_threshold: f64,
}

impl WorkflowConfig {
    pub fn location_timeout(&self) -> Duration {
        Duration::from_secs(self.location_timeout_secs)
    }

    pub fn with_location_timeout(mut self, timeout: Duration) -> Self {
        self.location_timeout_secs = timeout.as_secs();
        self
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    pub fn with_blur_threshold(mut self, threshold: f64) -> Self {
        self.blur_threshold = threshold;
        self
    }

    /// Reject settings that would make the workflow misbehave.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Configuration` for a zero timeout, an empty
    /// language or a negative/non-finite blur threshold.
    pub fn validate(&self) -> Result<()> {
        if self.location_timeout_secs == 0 {
            return Err(WorkflowError::Configuration {
                message: "location timeout must be at least one second".to_string(),
            });
        }
        if self.lang.trim().is_empty() {
            return Err(WorkflowError::Configuration {
                message: "address language must not be empty".to_string(),
            });
        }
        if !self.blur_threshold.is_finite() || self.blur_threshold < 0.0 {
            return Err(WorkflowError::Configuration {
                message: format!("invalid blur threshold: {}", self.blur_threshold),
            });
        }
        Ok(())
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            location_timeout_secs: DEFAULT_LOCATION_TIMEOUT.as_secs(),
            lang: "en".to_string(),
            blur_threshold: DEFAULT_BLUR_THRESHOLD,
        }
    }
}
