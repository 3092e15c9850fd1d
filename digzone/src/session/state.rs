//! Session state owned by the controller task.

use std::collections::HashMap;

use crate::collectible::Bone;
use crate::geo::GeoPoint;
use crate::location::PlayerLocation;
use crate::zone::Zone;

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Uninitialized,
    /// Started, waiting for the first location
    Initializing,
    /// At least one location has been handled
    Active,
}

/// Mutable state of a running session.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub location: Option<PlayerLocation>,
    pub visible_zones: Vec<Zone>,
    pub highlighted_zone: Option<String>,
    /// Bones pre-revealed by a scan, keyed by zone id
    pub revealed: HashMap<String, Bone>,
}

impl SessionState {
    pub fn position(&self) -> Option<GeoPoint> {
        self.location.map(|l| l.point())
    }

    /// Visible zone by id.
    pub fn zone(&self, id: &str) -> Option<&Zone> {
        self.visible_zones.iter().find(|z| z.id == id)
    }

    /// Uncollected visible zone whose center is closest to the player.
    pub fn nearest_uncollected(&self) -> Option<&Zone> {
        let position = self.position()?;
        self.visible_zones
            .iter()
            .filter(|z| !z.is_collected)
            .map(|z| (z, z.distance_from_center(&position)))
            .fold(None, |best: Option<(&Zone, f64)>, (zone, d)| match best {
                Some((_, nearest)) if nearest <= d => best,
                _ => Some((zone, d)),
            })
            .map(|(zone, _)| zone)
    }

    /// Marks a visible zone collected locally and drops any hint state for it.
    pub fn settle_collected(&mut self, id: &str, at: chrono::DateTime<chrono::Utc>) {
        if let Some(zone) = self.visible_zones.iter_mut().find(|z| z.id == id) {
            zone.collect(at);
        }
        self.revealed.remove(id);
        if self.highlighted_zone.as_deref() == Some(id) {
            self.highlighted_zone = None;
        }
    }

    /// Clears a highlight that no longer points at a collectable visible zone.
    pub fn prune_highlight(&mut self) {
        let keep = self
            .highlighted_zone
            .as_deref()
            .and_then(|id| self.zone(id))
            .is_some_and(|z| !z.is_collected);
        if !keep {
            self.highlighted_zone = None;
        }
    }

    pub fn snapshot(&self, sequence: u64) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            location: self.position(),
            visible_zones: self.visible_zones.clone(),
            highlighted_zone: self.highlighted_zone.clone(),
            revealed: self.revealed.clone(),
            sequence,
        }
    }
}

/// Read-only copy of the session state.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub location: Option<GeoPoint>,
    pub visible_zones: Vec<Zone>,
    pub highlighted_zone: Option<String>,
    pub revealed: HashMap<String, Bone>,
    /// Sequence number of the latest accepted location
    pub sequence: u64,
}
