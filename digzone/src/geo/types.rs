//! Geographic type definitions

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mean Earth radius used by every distance calculation.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Mean Earth radius in kilometers (bounding box math works in km).
pub const EARTH_RADIUS_KM: f64 = 6_371.0;

/// Valid latitude range
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range
pub const MIN_LNG: f64 = -180.0;
pub const MAX_LNG: f64 = 180.0;

/// A WGS84 point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees (-90 to 90)
    pub lat: f64,
    /// Longitude in degrees (-180 to 180)
    pub lng: f64,
}

impl GeoPoint {
    #[inline]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance to another point in meters.
    #[inline]
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        super::distance_meters(self.lat, self.lng, other.lat, other.lng)
    }

    /// Returns true if both components are inside the valid WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        (MIN_LAT..=MAX_LAT).contains(&self.lat) && (MIN_LNG..=MAX_LNG).contains(&self.lng)
    }
}

/// Axis-aligned lat/lng rectangle used as a cheap pre-filter for store queries.
///
/// The box is a superset of the disc it was computed from: every point
/// within the requested radius lies inside, but the corners reach further.
///
/// Near the antimeridian `min_lng` may be below -180 or `max_lng` above 180.
/// [`contains`](Self::contains) treats such a box as wrapping around.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    /// Returns true if the point lies inside the box (edges inclusive).
    #[inline]
    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.lat >= self.min_lat && point.lat <= self.max_lat && self.contains_lng(point.lng)
    }

    /// True if the box spills over the ±180° meridian.
    #[inline]
    pub fn crosses_antimeridian(&self) -> bool {
        self.min_lng < MIN_LNG || self.max_lng > MAX_LNG
    }

    fn contains_lng(&self, lng: f64) -> bool {
        let within = |l: f64| l >= self.min_lng && l <= self.max_lng;
        if within(lng) {
            return true;
        }
        self.crosses_antimeridian() && (within(lng + 360.0) || within(lng - 360.0))
    }
}

/// Errors that can occur during geographic calculations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    /// Latitude is outside valid range (-90 to 90)
    #[error("Invalid latitude: {0} (must be between {MIN_LAT} and {MAX_LAT})")]
    InvalidLatitude(f64),

    /// Longitude is outside valid range (-180 to 180)
    #[error("Invalid longitude: {0} (must be between {MIN_LNG} and {MAX_LNG})")]
    InvalidLongitude(f64),

    /// Radius is negative or not a finite number
    #[error("Invalid radius: {0} (must be a finite, non-negative number of meters)")]
    InvalidRadius(f64),
}
