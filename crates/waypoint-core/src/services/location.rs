//! Location providers and the bounded lookup used by the workflow.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use tokio::time::timeout;

use super::LocationProvider;
use crate::models::{Coordinate, ResolvedAddress};

/// Provider for devices without positioning. Every lookup fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocation;

#[async_trait]
impl LocationProvider for NoLocation {
    async fn current_coordinate(&self) -> Option<Coordinate> {
        None
    }

    async fn resolve_address(&self, _coordinate: Coordinate, _lang: &str) -> Option<ResolvedAddress> {
        None
    }
}

/// Provider pinned to one position, resolving to a fixed label or to the
/// coordinate text when no label is given.
#[derive(Debug, Clone)]
pub struct StaticLocation {
    coordinate: Coordinate,
    label: Option<String>,
}

impl StaticLocation {
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

#[async_trait]
impl LocationProvider for StaticLocation {
    async fn current_coordinate(&self) -> Option<Coordinate> {
        Some(self.coordinate)
    }

    async fn resolve_address(&self, coordinate: Coordinate, lang: &str) -> Option<ResolvedAddress> {
        Some(ResolvedAddress {
            formatted: self
                .label
                .clone()
                .unwrap_or_else(|| coordinate.to_string()),
            lang: lang.to_string(),
            coordinate,
        })
    }
}

/// Result of a bounded location lookup.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LocationFix {
    /// Fresh coordinate, or the cached one when the fetch failed
    pub coordinate: Option<Coordinate>,

    /// Resolved address, if resolution succeeded
    pub address: Option<ResolvedAddress>,
}

/// Fetch a coordinate and resolve it, each call bounded by `limit`.
///
/// A failed or timed-out fetch falls back to `cached`. Failures are logged
/// and never returned.
pub async fn locate(
    provider: &dyn LocationProvider,
    cached: Option<Coordinate>,
    lang: &str,
    limit: Duration,
) -> LocationFix {
    let coordinate = match timeout(limit, provider.current_coordinate()).await {
        Ok(Some(coordinate)) => Some(coordinate),
        Ok(None) => {
            warn!("Coordinate unavailable, using cached position");
            cached
        }
        Err(_) => {
            warn!("Coordinate fetch timed out after {limit:?}, using cached position");
            cached
        }
    };

    let Some(coordinate) = coordinate else {
        return LocationFix::default();
    };

    let address = match timeout(limit, provider.resolve_address(coordinate, lang)).await {
        Ok(Some(address)) => {
            debug!("Resolved {coordinate} to '{address}'");
            Some(address)
        }
        Ok(None) => {
            warn!("Address resolution failed for {coordinate}");
            None
        }
        Err(_) => {
            warn!("Address resolution timed out after {limit:?}");
            None
        }
    };

    LocationFix {
        coordinate: Some(coordinate),
        address,
    }
}
