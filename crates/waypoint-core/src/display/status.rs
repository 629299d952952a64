//! Status and confirmation messages for operation feedback.

use std::fmt;

/// One-line outcome of a command.
pub struct OperationStatus {
    pub message: String,
    pub success: bool,
}

impl OperationStatus {
    pub fn success(message: String) -> Self {
        Self {
            message,
            success: true,
        }
    }

    pub fn failure(message: String) -> Self {
        Self {
            message,
            success: false,
        }
    }

    /// A warning counts as a failure for styling but the command went on.
    pub fn warning(message: String) -> Self {
        Self {
            message: format!("⚠ {message}"),
            success: false,
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", if self.success { "Success:" } else { "Error:" }, self.message)
    }
}
