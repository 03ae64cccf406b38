//! Great-circle distance and coordinate helpers
//!
//! Walks are sampled at two points only (start and end), so the distance
//! reported for a walk is the haversine distance between those points.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometres
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Default base URL for walking directions deep links
pub const DEFAULT_MAP_URL: &str = "https://www.google.com/maps/dir/";

/// A coordinate in signed decimal degrees
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Distance to another location in kilometres
    pub fn distance_to(&self, other: &Location) -> f64 {
        distance_km(self.lat, self.lng, other.lat, other.lng)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}

/// Haversine distance between two coordinates, in kilometres.
///
/// Inputs are not validated: out-of-range degrees simply run through the
/// trigonometry. Identical points yield exactly 0.
pub fn distance_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlng = (lng2 - lng1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Build a walking-directions deep link between two points
pub fn directions_url(base: &str, origin: &Location, destination: &Location) -> String {
    format!(
        "{}?api=1&origin={},{}&destination={},{}&travelmode=walking",
        base, origin.lat, origin.lng, destination.lat, destination.lng
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_point_is_zero() {
        assert_eq!(distance_km(35.6812, 139.7671, 35.6812, 139.7671), 0.0);
        assert_eq!(distance_km(-33.9, 18.4, -33.9, 18.4), 0.0);
    }

    #[test]
    fn test_symmetry() {
        let ab = distance_km(35.6812, 139.7671, 35.4437, 139.6380);
        let ba = distance_km(35.4437, 139.6380, 35.6812, 139.7671);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn test_tokyo_to_yokohama() {
        let dist = distance_km(35.6812, 139.7671, 35.4437, 139.6380);
        assert!((dist - 27.0).abs() <= 2.0, "got {}", dist);
    }

    #[test]
    fn test_one_degree_of_longitude_at_equator() {
        let dist = distance_km(0.0, 0.0, 0.0, 1.0);
        assert!((dist - 111.195).abs() < 0.2);
    }

    #[test]
    fn test_directions_url() {
        let url = directions_url(
            DEFAULT_MAP_URL,
            &Location::new(35.0, 135.0),
            &Location::new(35.01, 135.01),
        );
        assert_eq!(
            url,
            "https://www.google.com/maps/dir/?api=1&origin=35,135&destination=35.01,135.01&travelmode=walking"
        );
    }

    #[test]
    fn test_location_display() {
        let loc = Location::new(35.0, 135.123_456_78);
        assert_eq!(loc.to_string(), "35.000000, 135.123457");
    }
}
