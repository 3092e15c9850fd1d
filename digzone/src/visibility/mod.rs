//! Visible zone tracking.
//!
//! The tracker answers "which zones can the player see right now" and
//! backfills the area with a fresh batch when the answer is "none".

use std::sync::Arc;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::generator::ZoneGenerator;
use crate::geo::{self, GeoError, GeoPoint};
use crate::road::RoadSnapClient;
use crate::store::{StoreError, ZoneStore};
use crate::zone::Zone;

/// Errors from visibility queries.
#[derive(Debug, Error)]
pub enum VisibilityError {
    /// Player position is not a valid coordinate
    #[error("Invalid player position: {0}")]
    InvalidPosition(#[from] GeoError),

    /// Zone store failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result of a combined ensure-then-query pass.
#[derive(Debug, Clone, Default)]
pub struct Refresh {
    /// Whether a generation batch ran
    pub generated: bool,
    /// Zones within the aura after the pass
    pub zones: Vec<Zone>,
}

/// Tracks zones within the aura of a player.
pub struct VisibilityTracker<S: ZoneStore, R: RoadSnapClient> {
    store: Arc<S>,
    generator: Arc<ZoneGenerator<R>>,
}

impl<S: ZoneStore, R: RoadSnapClient> Clone for VisibilityTracker<S, R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            generator: Arc::clone(&self.generator),
        }
    }
}

impl<S: ZoneStore, R: RoadSnapClient> VisibilityTracker<S, R> {
    pub fn new(store: Arc<S>, generator: Arc<ZoneGenerator<R>>) -> Self {
        Self { store, generator }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn generator(&self) -> &Arc<ZoneGenerator<R>> {
        &self.generator
    }

    /// Radius of the visible area in meters.
    pub fn aura_radius_m(&self) -> f64 {
        self.generator.config().aura_radius_m
    }

    /// Zones whose centers lie within the aura of `player`.
    ///
    /// The store is queried with the enclosing bounding box, then the
    /// corners are cut away with an exact distance check. Collected zones
    /// remain visible.
    pub async fn visible_zones(&self, player: GeoPoint) -> Result<Vec<Zone>, VisibilityError> {
        let aura = self.aura_radius_m();
        let bbox = geo::bounding_box(player.lat, player.lng, aura)?;

        let mut zones = self.store.zones_in_bounding_box(&bbox).await?;
        zones.retain(|z| z.distance_from_center(&player) <= aura);
        Ok(zones)
    }

    /// Generates a batch around `player` if no zone is currently visible.
    ///
    /// Returns whether generation ran. Calling this again once zones exist
    /// is a no-op.
    pub async fn ensure_zones_exist(
        &self,
        player: GeoPoint,
        cancel: &CancellationToken,
    ) -> Result<bool, VisibilityError> {
        if !self.visible_zones(player).await?.is_empty() {
            return Ok(false);
        }

        debug!(lat = player.lat, lng = player.lng, "No visible zones, generating");
        self.generator
            .populate(self.store.as_ref(), player, cancel)
            .await?;
        Ok(true)
    }

    /// Backfills if needed, then returns the visible set.
    pub async fn refresh(
        &self,
        player: GeoPoint,
        cancel: &CancellationToken,
    ) -> Result<Refresh, VisibilityError> {
        let generated = self.ensure_zones_exist(player, cancel).await?;
        let zones = self.visible_zones(player).await?;
        Ok(Refresh { generated, zones })
    }
}
