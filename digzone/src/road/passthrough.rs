//! Snapper that performs no snapping.

use super::{RoadSnapClient, RoadSnapError};
use crate::geo::GeoPoint;

/// Returns every candidate unchanged.
///
/// Used when no Roads API key is configured and in tests that need a
/// deterministic snapper.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughSnapper;

impl RoadSnapClient for PassthroughSnapper {
    async fn snap_to_road(&self, point: GeoPoint) -> Result<Option<GeoPoint>, RoadSnapError> {
        Ok(Some(point))
    }
}
