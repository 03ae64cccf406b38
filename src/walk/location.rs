//! Location provider seam
//!
//! The platform geolocation service is consumed as a single-shot
//! "get current position" request. Implementations resolve once with either
//! a fix or an error; the core adds no timeout and no retry.

use super::geo::Location;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::collections::VecDeque;
use std::sync::Mutex;

/// A resolved position together with its capture time (local)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fix {
    pub location: Location,
    pub at: NaiveDateTime,
}

impl Fix {
    pub fn new(location: Location, at: NaiveDateTime) -> Self {
        Self { location, at }
    }
}

/// Reasons a location request can fail.
///
/// All of these collapse to a single user-facing "location unavailable"
/// message; the variants are kept for logging.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocationError {
    #[error("geolocation is not supported on this platform")]
    Unsupported,

    #[error("location permission denied")]
    PermissionDenied,

    #[error("location request timed out")]
    Timeout,

    #[error("{0}")]
    Other(String),
}

/// Single-shot geolocation source
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Resolve the current position once
    async fn current_fix(&self) -> Result<Fix, LocationError>;
}

/// Provider for platforms with no geolocation capability at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocation;

#[async_trait]
impl LocationProvider for NoLocation {
    fn name(&self) -> &str {
        "none"
    }

    async fn current_fix(&self) -> Result<Fix, LocationError> {
        Err(LocationError::Unsupported)
    }
}

/// Provider that replays a queue of prepared responses.
///
/// Used by the demo binary and tests. Once the queue is drained every
/// request times out.
#[derive(Debug, Default)]
pub struct ScriptedLocation {
    responses: Mutex<VecDeque<Result<Fix, LocationError>>>,
}

impl ScriptedLocation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fix(self, fix: Fix) -> Self {
        self.push(Ok(fix));
        self
    }

    pub fn with_error(self, error: LocationError) -> Self {
        self.push(Err(error));
        self
    }

    pub fn push(&self, response: Result<Fix, LocationError>) {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(response);
        }
    }

    pub fn remaining(&self) -> usize {
        self.responses.lock().map(|q| q.len()).unwrap_or(0)
    }
}

#[async_trait]
impl LocationProvider for ScriptedLocation {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn current_fix(&self) -> Result<Fix, LocationError> {
        let next = self
            .responses
            .lock()
            .map_err(|e| LocationError::Other(format!("provider poisoned: {}", e)))?
            .pop_front();

        next.unwrap_or(Err(LocationError::Timeout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn test_scripted_replays_in_order() {
        let provider = ScriptedLocation::new()
            .with_fix(Fix::new(Location::new(35.0, 135.0), at(9, 0)))
            .with_error(LocationError::PermissionDenied);

        assert_eq!(provider.remaining(), 2);

        let first = provider.current_fix().await.unwrap();
        assert_eq!(first.location, Location::new(35.0, 135.0));

        let second = provider.current_fix().await;
        assert_eq!(second, Err(LocationError::PermissionDenied));

        // Drained queue behaves like a platform timeout
        assert_eq!(provider.current_fix().await, Err(LocationError::Timeout));
    }

    #[tokio::test]
    async fn test_no_location_is_unsupported() {
        assert_eq!(NoLocation.current_fix().await, Err(LocationError::Unsupported));
    }
}
