//! Zone persistence.
//!
//! The engine talks to storage through the [`ZoneStore`] trait so the host
//! can plug in whatever key-value backend it has. Two implementations ship
//! with the crate:
//!
//! - [`MemoryZoneStore`] - process-local, used by tests and short sessions
//! - [`FileZoneStore`] - JSON snapshot on disk, used by the CLI

mod file;
mod memory;

pub use file::FileZoneStore;
pub use memory::MemoryZoneStore;

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::geo::BoundingBox;
use crate::zone::Zone;

/// Errors returned by zone stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure while reading or writing the snapshot
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot could not be encoded or decoded
    #[error("Store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend refused the operation
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Asynchronous zone persistence.
///
/// Implementations must make [`mark_collected`](Self::mark_collected) an
/// atomic check-and-set: two concurrent calls for the same id must not both
/// return `true`.
pub trait ZoneStore: Send + Sync + 'static {
    /// Returns every zone whose center lies inside the box.
    fn zones_in_bounding_box(
        &self,
        bbox: &BoundingBox,
    ) -> impl Future<Output = Result<Vec<Zone>, StoreError>> + Send;

    /// Returns every stored zone.
    fn all(&self) -> impl Future<Output = Result<Vec<Zone>, StoreError>> + Send;

    /// Inserts a batch of zones. A zone whose id already exists replaces the
    /// stored one.
    fn insert_all(&self, zones: Vec<Zone>) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Marks a zone collected.
    ///
    /// Returns `Ok(false)` if the zone does not exist or was already
    /// collected.
    fn mark_collected(
        &self,
        id: &str,
        at: DateTime<Utc>,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Clears the collected flag set by [`mark_collected`](Self::mark_collected).
    ///
    /// Used to roll back a claim whose reward could not be delivered.
    /// Returns `Ok(false)` if the zone does not exist or is not collected.
    fn release_collected(&self, id: &str)
        -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Deletes every zone and returns how many were removed.
    fn delete_all(&self) -> impl Future<Output = Result<usize, StoreError>> + Send;
}

impl<S: ZoneStore> ZoneStore for Arc<S> {
    fn zones_in_bounding_box(
        &self,
        bbox: &BoundingBox,
    ) -> impl Future<Output = Result<Vec<Zone>, StoreError>> + Send {
        (**self).zones_in_bounding_box(bbox)
    }

    fn all(&self) -> impl Future<Output = Result<Vec<Zone>, StoreError>> + Send {
        (**self).all()
    }

    fn insert_all(&self, zones: Vec<Zone>) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).insert_all(zones)
    }

    fn mark_collected(
        &self,
        id: &str,
        at: DateTime<Utc>,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send {
        (**self).mark_collected(id, at)
    }

    fn release_collected(&self, id: &str) -> impl Future<Output = Result<bool, StoreError>> + Send {
        (**self).release_collected(id)
    }

    fn delete_all(&self) -> impl Future<Output = Result<usize, StoreError>> + Send {
        (**self).delete_all()
    }
}

/// Replaces zones with matching ids and appends the rest.
pub(crate) fn upsert(existing: &mut Vec<Zone>, incoming: Vec<Zone>) {
    for zone in incoming {
        match existing.iter_mut().find(|z| z.id == zone.id) {
            Some(slot) => *slot = zone,
            None => existing.push(zone),
        }
    }
}

/// Zones whose centers fall inside `bbox`.
pub(crate) fn filter_in_box(zones: &[Zone], bbox: &BoundingBox) -> Vec<Zone> {
    zones
        .iter()
        .filter(|z| bbox.contains(&z.center()))
        .cloned()
        .collect()
}
