//! Geographic math module
//!
//! Provides the spherical-earth primitives the engine is built on:
//! haversine distance, bounding boxes for store pre-filtering, and
//! uniform random sampling of points inside a disc.

mod types;


pub use types::{
    BoundingBox, GeoError, GeoPoint, EARTH_RADIUS_KM, EARTH_RADIUS_METERS, MAX_LAT, MAX_LNG,
    MIN_LAT, MIN_LNG,
};

use rand::Rng;
use std::f64::consts::PI;

/// Great-circle distance between two points in meters (haversine).
#[inline]
pub fn distance_meters(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Computes the lat/lng box enclosing a disc of `radius_m` around a point.
///
/// # Arguments
///
/// * `lat` - Latitude in degrees (-90.0 to 90.0)
/// * `lng` - Longitude in degrees (-180.0 to 180.0)
/// * `radius_m` - Disc radius in meters
///
/// # Returns
///
/// The bounding box, or an error if the inputs are out of range.
/// Longitudes are left unwrapped, so a box near ±180° may extend past it;
/// [`BoundingBox::contains`] accounts for that.
pub fn bounding_box(lat: f64, lng: f64, radius_m: f64) -> Result<BoundingBox, GeoError> {
    if !(MIN_LAT..=MAX_LAT).contains(&lat) {
        return Err(GeoError::InvalidLatitude(lat));
    }
    if !(MIN_LNG..=MAX_LNG).contains(&lng) {
        return Err(GeoError::InvalidLongitude(lng));
    }
    if !radius_m.is_finite() || radius_m < 0.0 {
        return Err(GeoError::InvalidRadius(radius_m));
    }

    let radius_km = radius_m / 1000.0;
    let deg_lat = radius_km / EARTH_RADIUS_KM * (180.0 / PI);
    let deg_lng = deg_lat / lat.to_radians().cos();

    Ok(BoundingBox {
        min_lat: lat - deg_lat,
        max_lat: lat + deg_lat,
        min_lng: lng - deg_lng,
        max_lng: lng + deg_lng,
    })
}

/// Samples a point uniformly (by area) inside a disc around `(lat, lng)`.
///
/// Uses `r = R * sqrt(u)` and `theta = 2 * PI * v`; the `sqrt` keeps the
/// samples from clustering at the center.
pub fn random_point_in_disc<R: Rng + ?Sized>(
    rng: &mut R,
    lat: f64,
    lng: f64,
    radius_m: f64,
) -> GeoPoint {
    let u: f64 = rng.gen();
    let v: f64 = rng.gen();

    let distance = radius_m * u.sqrt();
    let bearing = 2.0 * PI * v;

    destination_radians(GeoPoint::new(lat, lng), bearing, distance)
}

/// Returns the point reached by travelling `distance_m` from `origin`
/// along the initial bearing `bearing_deg` (0 = north, 90 = east).
pub fn destination_point(origin: GeoPoint, bearing_deg: f64, distance_m: f64) -> GeoPoint {
    destination_radians(origin, bearing_deg.to_radians(), distance_m)
}

fn destination_radians(origin: GeoPoint, bearing: f64, distance_m: f64) -> GeoPoint {
    let angular = distance_m / EARTH_RADIUS_METERS;
    let lat1 = origin.lat.to_radians();
    let lng1 = origin.lng.to_radians();

    let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * bearing.cos()).asin();
    let lng2 = lng1
        + (bearing.sin() * angular.sin() * lat1.cos())
            .atan2(angular.cos() - lat1.sin() * lat2.sin());

    GeoPoint::new(lat2.to_degrees(), normalize_lng(lng2.to_degrees()))
}

/// Wraps a longitude into [-180, 180).
#[inline]
fn normalize_lng(lng: f64) -> f64 {
    if (MIN_LNG..MAX_LNG).contains(&lng) {
        lng
    } else {
        (lng + 540.0).rem_euclid(360.0) - 180.0
    }
}
