//! Error types for the workflow library.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::StepKind;

/// Comprehensive error type for all workflow operations.
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Job not found for the given ID
    #[error("Job with ID {id} not found")]
    JobNotFound { id: u64 },
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// The current step is missing captured data required to confirm it
    #[error("Step '{step}' is not ready: {reason}")]
    StepNotReady { step: StepKind, reason: String },
    /// A photo slot was addressed while its step is not the current one
    #[error("Photo slot '{slot}' belongs to step '{owner}', current step is '{current}'")]
    SlotNotActive {
        slot: String,
        owner: StepKind,
        current: StepKind,
    },
    /// The delayed flag can only change at the incident-selection step
    #[error("Delay flag is locked at step '{step}'")]
    DelayLocked { step: StepKind },
    /// Another confirmation is still in flight for this session
    #[error("Session is busy with another confirmation")]
    SessionBusy,
    /// No job has been started
    #[error("No active session")]
    NoActiveSession,
    /// A job is already being worked on
    #[error("Session already active for job {job_id}")]
    SessionActive { job_id: u64 },
    /// Terminal confirmation without the data a delivery record needs
    #[error("Cannot complete job {job_id}: missing {missing}")]
    IncompleteRecord { job_id: u64, missing: String },
    /// A collaborator rejected a save
    #[error("Persistence failed: {message}")]
    Persistence { message: String },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> WorkflowError {
        WorkflowError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> WorkflowError {
        WorkflowError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl WorkflowError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Creates a step-not-ready error.
    pub fn not_ready(step: StepKind, reason: impl Into<String>) -> Self {
        Self::StepNotReady {
            step,
            reason: reason.into(),
        }
    }

    /// Whether the error is a rejected user input rather than a fault.
    ///
    /// Input errors leave the session untouched and are shown inline.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput { .. }
                | Self::StepNotReady { .. }
                | Self::SlotNotActive { .. }
                | Self::DelayLocked { .. }
        )
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| WorkflowError::database(message).with_source(e))
    }
}

/// Result type alias for workflow operations
pub type Result<T> = std::result::Result<T, WorkflowError>;
