//! Proximity detection for hidden points.

use crate::geo::GeoPoint;
use crate::zone::{Zone, DEFAULT_COLLECTION_RADIUS_M};

/// Finds the zone a player is standing on.
#[derive(Debug, Clone, Copy)]
pub struct CollectionDetector {
    collection_radius_m: f64,
}

impl Default for CollectionDetector {
    fn default() -> Self {
        Self::new(DEFAULT_COLLECTION_RADIUS_M)
    }
}

impl CollectionDetector {
    pub fn new(collection_radius_m: f64) -> Self {
        Self {
            collection_radius_m,
        }
    }

    pub fn collection_radius_m(&self) -> f64 {
        self.collection_radius_m
    }

    /// Returns the uncollected zone whose hidden point is within the
    /// collection radius of `location`.
    ///
    /// When several qualify the nearest hidden point wins; exact ties go to
    /// the zone listed first.
    pub fn check_collection<'a>(&self, location: &GeoPoint, zones: &'a [Zone]) -> Option<&'a Zone> {
        let mut best: Option<(&Zone, f64)> = None;

        for zone in zones.iter().filter(|z| !z.is_collected) {
            let distance = zone.distance_from_hidden(location);
            if distance > self.collection_radius_m {
                continue;
            }
            match best {
                Some((_, nearest)) if nearest <= distance => {}
                _ => best = Some((zone, distance)),
            }
        }

        best.map(|(zone, _)| zone)
    }
}
