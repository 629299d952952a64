//! Run-sheet number normalisation.
//!
//! The number is typed by the driver or read from the QR code printed on the
//! sheet. Both paths go through [`normalize`] so the stored value does not
//! depend on how it was captured.

use crate::error::{Result, WorkflowError};

/// Trim, collapse inner whitespace and upper-case a run-sheet number.
///
/// # Errors
///
/// Returns `WorkflowError::InvalidInput` when nothing is left.
///
/// # Examples
///
/// ```rust
/// use waypoint_core::runsheet::normalize;
///
/// assert_eq!(normalize("  rs-001 ").unwrap(), "RS-001");
/// assert_eq!(normalize("rs  001").unwrap(), "RS 001");
/// assert!(normalize("   ").is_err());
/// ```
pub fn normalize(raw: &str) -> Result<String> {
    let value = raw.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase();
    if value.is_empty() {
        return Err(WorkflowError::invalid_input("run_sheet").with_reason("must not be empty"));
    }
    Ok(value)
}

/// Extract the run-sheet number from a scanned QR payload.
///
/// Payloads are either the bare number or a URL/query string carrying it in
/// a `runsheet` or `rs` parameter.
///
/// # Errors
///
/// Returns `WorkflowError::InvalidInput` when the payload carries no number.
pub fn from_scan(payload: &str) -> Result<String> {
    let payload = payload.trim();
    let query = payload.split_once('?').map_or(payload, |(_, query)| query);
    if query.contains('=') {
        let value = query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| key.eq_ignore_ascii_case("runsheet") || key.eq_ignore_ascii_case("rs"))
            .map(|(_, value)| value);
        return match value {
            Some(value) => normalize(value),
            None => Err(WorkflowError::invalid_input("run_sheet")
                .with_reason("scanned code does not contain a run-sheet number")),
        };
    }
    normalize(payload)
}
