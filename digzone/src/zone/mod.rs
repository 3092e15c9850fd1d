//! Dig zone data model.
//!
//! A zone is a circular region with a publicly visible boundary and a hidden
//! collection point somewhere inside it. Zones are created by the
//! [`ZoneGenerator`](crate::generator::ZoneGenerator), mutated only when the
//! player collects them, and deleted wholesale by the daily purge.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::geo::{self, GeoPoint};

/// Default radius of a zone's visible boundary in meters.
pub const DEFAULT_ZONE_RADIUS_M: f64 = 100.0;

/// Default distance a player must be from a hidden point to collect it.
pub const DEFAULT_COLLECTION_RADIUS_M: f64 = 25.0;

/// Fraction of the zone radius inside which the hidden point is placed.
pub const HIDDEN_POINT_RATIO: f64 = 0.8;

/// A persisted dig zone.
///
/// This struct is the on-disk schema of the file-backed store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    pub center_lat: f64,
    pub center_lng: f64,
    /// Radius of the visible boundary in meters
    pub radius: f64,
    pub hidden_lat: f64,
    pub hidden_lng: f64,
    #[serde(default)]
    pub is_collected: bool,
    #[serde(default)]
    pub collected_at: Option<DateTime<Utc>>,
}

impl Zone {
    /// Creates an uncollected zone.
    pub fn new(id: impl Into<String>, center: GeoPoint, radius: f64, hidden: GeoPoint) -> Self {
        Self {
            id: id.into(),
            center_lat: center.lat,
            center_lng: center.lng,
            radius,
            hidden_lat: hidden.lat,
            hidden_lng: hidden.lng,
            is_collected: false,
            collected_at: None,
        }
    }

    #[inline]
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(self.center_lat, self.center_lng)
    }

    #[inline]
    pub fn hidden_point(&self) -> GeoPoint {
        GeoPoint::new(self.hidden_lat, self.hidden_lng)
    }

    /// Distance from the zone center to a point in meters.
    pub fn distance_from_center(&self, point: &GeoPoint) -> f64 {
        geo::distance_meters(self.center_lat, self.center_lng, point.lat, point.lng)
    }

    /// Distance from the hidden point to a point in meters.
    pub fn distance_from_hidden(&self, point: &GeoPoint) -> f64 {
        geo::distance_meters(self.hidden_lat, self.hidden_lng, point.lat, point.lng)
    }

    /// Records a collection. Returns false if the zone was already collected.
    pub fn collect(&mut self, at: DateTime<Utc>) -> bool {
        if self.is_collected {
            return false;
        }
        self.is_collected = true;
        self.collected_at = Some(at);
        true
    }

    /// Undoes [`collect`](Self::collect). Returns false if the zone was not
    /// collected.
    pub fn release(&mut self) -> bool {
        if !self.is_collected {
            return false;
        }
        self.is_collected = false;
        self.collected_at = None;
        true
    }
}

/// Builds a unique zone id from the batch timestamp and the zone's index.
///
/// A short random suffix keeps ids distinct when two batches are generated
/// within the same millisecond.
pub fn zone_id<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>, index: usize) -> String {
    let suffix: u16 = rng.gen();
    format!("zone_{}_{}_{:04x}", now.timestamp_millis(), index, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_zone() -> Zone {
        Zone::new(
            "zone_1_0_abcd",
            GeoPoint::new(51.5, -0.12),
            DEFAULT_ZONE_RADIUS_M,
            GeoPoint::new(51.5003, -0.1201),
        )
    }

    #[test]
    fn test_new_zone_is_uncollected() {
        let zone = sample_zone();
        assert!(!zone.is_collected);
        assert!(zone.collected_at.is_none());
        assert_eq!(zone.center(), GeoPoint::new(51.5, -0.12));
        assert_eq!(zone.hidden_point(), GeoPoint::new(51.5003, -0.1201));
    }

    #[test]
    fn test_collect_only_once() {
        let mut zone = sample_zone();
        let first = Utc::now();

        assert!(zone.collect(first));
        assert!(zone.is_collected);
        assert_eq!(zone.collected_at, Some(first));

        assert!(!zone.collect(Utc::now()));
        assert_eq!(zone.collected_at, Some(first), "timestamp must not move");
    }

    #[test]
    fn test_release_clears_collection() {
        let mut zone = sample_zone();
        assert!(!zone.release());

        zone.collect(Utc::now());
        assert!(zone.release());
        assert!(!zone.is_collected);
        assert!(zone.collected_at.is_none());
    }

    #[test]
    fn test_serde_round_trip_preserves_collection() {
        let mut zone = sample_zone();
        zone.collect(Utc::now());

        let json = serde_json::to_string(&zone).unwrap();
        let back: Zone = serde_json::from_str(&json).unwrap();
        assert_eq!(back, zone);
    }

    #[test]
    fn test_deserialize_without_collection_fields() {
        let json = r#"{"id":"z","center_lat":1.0,"center_lng":2.0,"radius":100.0,
                       "hidden_lat":1.0001,"hidden_lng":2.0001}"#;
        let zone: Zone = serde_json::from_str(json).unwrap();
        assert!(!zone.is_collected);
        assert!(zone.collected_at.is_none());
    }

    #[test]
    fn test_zone_id_format() {
        let mut rng = StdRng::seed_from_u64(3);
        let now = Utc::now();
        let id = zone_id(&mut rng, now, 7);

        let prefix = format!("zone_{}_7_", now.timestamp_millis());
        assert!(id.starts_with(&prefix), "unexpected id {}", id);
        assert_eq!(id.len(), prefix.len() + 4);
    }

    #[test]
    fn test_distances() {
        let zone = sample_zone();
        assert!(zone.distance_from_center(&zone.center()) < 1e-9);
        assert!(zone.distance_from_hidden(&zone.hidden_point()) < 1e-9);
        assert!(zone.distance_from_center(&zone.hidden_point()) < zone.radius);
    }
}
