//! Walk tracking
//!
//! - **geo**: haversine distance and map deep links
//! - **location**: the async geolocation provider seam
//! - **tracker**: the `Idle`/`Tracking` state machine that turns two fixes
//!   into a finished walk record
//!
//! ```text
//! Idle --start(fix)--> Tracking --finish(fix)--> Idle + walk record
//! ```

mod geo;
mod location;
mod tracker;

pub use geo::{directions_url, distance_km, Location, DEFAULT_MAP_URL, EARTH_RADIUS_KM};
pub use location::{Fix, LocationError, LocationProvider, NoLocation, ScriptedLocation};
pub use tracker::{PendingFix, WalkStart, WalkState, WalkTracker};

use thiserror::Error;

/// Errors raised by walk tracking
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WalkError {
    /// The platform could not provide a position (absent, denied, timed out)
    #[error("Location unavailable: {0}")]
    LocationUnavailable(#[from] LocationError),

    /// `start` while a walk is already being tracked
    #[error("Invalid state: tracking in progress")]
    AlreadyTracking,

    /// `finish` with no walk being tracked
    #[error("Invalid state: no walk in progress")]
    NotTracking,

    /// A location request for this tracker has not resolved yet
    #[error("Invalid state: location request already pending")]
    RequestPending,
}

impl WalkError {
    /// True for the transition errors (as opposed to location failures)
    pub fn is_invalid_state(&self) -> bool {
        !matches!(self, WalkError::LocationUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            WalkError::AlreadyTracking.to_string(),
            "Invalid state: tracking in progress"
        );
        assert_eq!(
            WalkError::from(LocationError::Timeout).to_string(),
            "Location unavailable: location request timed out"
        );
    }

    #[test]
    fn test_invalid_state_classification() {
        assert!(WalkError::NotTracking.is_invalid_state());
        assert!(WalkError::RequestPending.is_invalid_state());
        assert!(!WalkError::LocationUnavailable(LocationError::Unsupported).is_invalid_state());
    }
}
