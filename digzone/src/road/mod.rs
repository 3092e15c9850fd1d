//! Road snapping.
//!
//! Candidate zone centers are snapped to the nearest road so that players
//! can actually reach them. The engine depends only on the
//! [`RoadSnapClient`] trait; the concrete clients are:
//!
//! - [`GoogleRoadsClient`] - Google Roads `snapToRoads` over HTTP
//! - [`PassthroughSnapper`] - returns the input unchanged (offline play, tests)

mod google;
mod http;
mod passthrough;

pub use google::{GoogleRoadsClient, DEFAULT_ROADS_BASE_URL};
pub use http::{AsyncHttpClient, AsyncReqwestClient, DEFAULT_HTTP_TIMEOUT_SECS};
pub use passthrough::PassthroughSnapper;

#[cfg(test)]
pub use http::tests::MockAsyncHttpClient;

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;

use crate::geo::GeoPoint;

/// Errors from road snapping.
///
/// The generator treats every error as "no snap", so these only surface in
/// logs and in direct callers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoadSnapError {
    /// Transport failure or non-success HTTP status
    #[error("HTTP error: {0}")]
    Http(String),

    /// Response body could not be interpreted
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Snaps a coordinate to the nearest road.
pub trait RoadSnapClient: Send + Sync + 'static {
    /// Returns the snapped point, or `None` if no road is nearby.
    fn snap_to_road(
        &self,
        point: GeoPoint,
    ) -> impl Future<Output = Result<Option<GeoPoint>, RoadSnapError>> + Send;
}

impl<T: RoadSnapClient> RoadSnapClient for Arc<T> {
    fn snap_to_road(
        &self,
        point: GeoPoint,
    ) -> impl Future<Output = Result<Option<GeoPoint>, RoadSnapError>> + Send {
        (**self).snap_to_road(point)
    }
}
