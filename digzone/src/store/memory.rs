//! In-memory zone store.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use super::{filter_in_box, upsert, StoreError, ZoneStore};
use crate::geo::BoundingBox;
use crate::zone::Zone;

/// Zone store backed by a vector behind a read-write lock.
#[derive(Debug, Default)]
pub struct MemoryZoneStore {
    zones: RwLock<Vec<Zone>>,
}

impl MemoryZoneStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with zones.
    pub fn with_zones(zones: Vec<Zone>) -> Self {
        let store = Self::new();
        upsert(&mut store.zones.write(), zones);
        store
    }

    pub fn len(&self) -> usize {
        self.zones.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.read().is_empty()
    }

    /// Looks up a single zone by id.
    pub fn get(&self, id: &str) -> Option<Zone> {
        self.zones.read().iter().find(|z| z.id == id).cloned()
    }
}

impl ZoneStore for MemoryZoneStore {
    async fn zones_in_bounding_box(&self, bbox: &BoundingBox) -> Result<Vec<Zone>, StoreError> {
        Ok(filter_in_box(&self.zones.read(), bbox))
    }

    async fn all(&self) -> Result<Vec<Zone>, StoreError> {
        Ok(self.zones.read().clone())
    }

    async fn insert_all(&self, zones: Vec<Zone>) -> Result<(), StoreError> {
        upsert(&mut self.zones.write(), zones);
        Ok(())
    }

    async fn mark_collected(&self, id: &str, at: DateTime<Utc>) -> Result<bool, StoreError> {
        let mut zones = self.zones.write();
        Ok(zones
            .iter_mut()
            .find(|z| z.id == id)
            .map(|z| z.collect(at))
            .unwrap_or(false))
    }

    async fn release_collected(&self, id: &str) -> Result<bool, StoreError> {
        let mut zones = self.zones.write();
        Ok(zones
            .iter_mut()
            .find(|z| z.id == id)
            .is_some_and(Zone::release))
    }

    async fn delete_all(&self) -> Result<usize, StoreError> {
        let mut zones = self.zones.write();
        let removed = zones.len();
        zones.clear();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{bounding_box, GeoPoint};
    use std::sync::Arc;

    fn zone(id: &str, lat: f64, lng: f64) -> Zone {
        Zone::new(id, GeoPoint::new(lat, lng), 100.0, GeoPoint::new(lat, lng))
    }

    #[tokio::test]
    async fn test_insert_and_query_by_box() {
        let store = MemoryZoneStore::new();
        store
            .insert_all(vec![zone("near", 0.001, 0.001), zone("far", 1.0, 1.0)])
            .await
            .unwrap();

        let bbox = bounding_box(0.0, 0.0, 1000.0).unwrap();
        let found = store.zones_in_bounding_box(&bbox).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "near");
    }

    #[tokio::test]
    async fn test_insert_replaces_same_id() {
        let store = MemoryZoneStore::with_zones(vec![zone("a", 0.0, 0.0)]);
        store.insert_all(vec![zone("a", 5.0, 5.0)]).await.unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("a").unwrap().center_lat, 5.0);
    }

    #[tokio::test]
    async fn test_mark_collected_is_check_and_set() {
        let store = MemoryZoneStore::with_zones(vec![zone("a", 0.0, 0.0)]);

        assert!(store.mark_collected("a", Utc::now()).await.unwrap());
        assert!(!store.mark_collected("a", Utc::now()).await.unwrap());
        assert!(!store.mark_collected("missing", Utc::now()).await.unwrap());
        assert!(store.get("a").unwrap().is_collected);
    }

    #[tokio::test]
    async fn test_release_undoes_collection() {
        let store = MemoryZoneStore::with_zones(vec![zone("a", 0.0, 0.0)]);
        store.mark_collected("a", Utc::now()).await.unwrap();

        assert!(store.release_collected("a").await.unwrap());
        assert!(!store.get("a").unwrap().is_collected);
        assert!(!store.release_collected("a").await.unwrap());
        assert!(!store.release_collected("missing").await.unwrap());

        // Claimable again
        assert!(store.mark_collected("a", Utc::now()).await.unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_mark_collected_single_winner() {
        let store = Arc::new(MemoryZoneStore::with_zones(vec![zone("a", 0.0, 0.0)]));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.mark_collected("a", Utc::now()).await.unwrap()
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn test_delete_all_returns_count() {
        let store = MemoryZoneStore::with_zones(vec![zone("a", 0.0, 0.0), zone("b", 0.1, 0.1)]);

        assert_eq!(store.delete_all().await.unwrap(), 2);
        assert!(store.is_empty());
        assert_eq!(store.delete_all().await.unwrap(), 0);
    }
}
