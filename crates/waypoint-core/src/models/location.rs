//! Device coordinates and resolved addresses.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WorkflowError};

/// A WGS84 position reported by the device.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting values outside the valid ranges.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::InvalidInput` for a latitude outside
    /// `[-90, 90]`, a longitude outside `[-180, 180]`, or a non-finite value.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(WorkflowError::invalid_input("latitude")
                .with_reason(format!("{latitude} is outside [-90, 90]")));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(WorkflowError::invalid_input("longitude")
                .with_reason(format!("{longitude} is outside [-180, 180]")));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// Human-readable address produced by reverse geocoding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolvedAddress {
    /// Single-line formatted address
    pub formatted: String,

    /// Language the address was resolved in
    pub lang: String,

    /// The coordinate that was resolved
    pub coordinate: Coordinate,
}

impl fmt::Display for ResolvedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formatted)
    }
}
