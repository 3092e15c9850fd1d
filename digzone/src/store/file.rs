//! JSON file-backed zone store.
//!
//! The full zone list is kept in memory and every mutation rewrites the
//! snapshot. Writes go to a sibling temp file which is then renamed over
//! the snapshot, so a crash never leaves a truncated file behind.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::{filter_in_box, upsert, StoreError, ZoneStore};
use crate::geo::BoundingBox;
use crate::zone::Zone;

/// Zone store persisted as a JSON array on disk.
#[derive(Debug)]
pub struct FileZoneStore {
    path: PathBuf,
    zones: Mutex<Vec<Zone>>,
}

impl FileZoneStore {
    /// Opens the store at `path`, loading the existing snapshot if present.
    ///
    /// A missing file is treated as an empty store; the file is created on
    /// the first write.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let zones = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Vec::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        info!(path = %path.display(), zones = zones.len(), "Zone store opened");

        Ok(Self {
            path,
            zones: Mutex::new(zones),
        })
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, zones: &[Zone]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_vec_pretty(zones)?;
        let tmp = self.path.with_extension("json.tmp");

        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        debug!(path = %self.path.display(), zones = zones.len(), "Zone snapshot written");
        Ok(())
    }
}

impl ZoneStore for FileZoneStore {
    async fn zones_in_bounding_box(&self, bbox: &BoundingBox) -> Result<Vec<Zone>, StoreError> {
        let zones = self.zones.lock().await;
        Ok(filter_in_box(&zones, bbox))
    }

    async fn all(&self) -> Result<Vec<Zone>, StoreError> {
        Ok(self.zones.lock().await.clone())
    }

    async fn insert_all(&self, incoming: Vec<Zone>) -> Result<(), StoreError> {
        let mut zones = self.zones.lock().await;
        let mut next = zones.clone();
        upsert(&mut next, incoming);

        self.persist(&next).await?;
        *zones = next;
        Ok(())
    }

    async fn mark_collected(&self, id: &str, at: DateTime<Utc>) -> Result<bool, StoreError> {
        let mut zones = self.zones.lock().await;
        let Some(index) = zones.iter().position(|z| z.id == id) else {
            return Ok(false);
        };

        let mut next = zones.clone();
        if !next[index].collect(at) {
            return Ok(false);
        }

        self.persist(&next).await?;
        *zones = next;
        Ok(true)
    }

    async fn release_collected(&self, id: &str) -> Result<bool, StoreError> {
        let mut zones = self.zones.lock().await;
        let Some(index) = zones.iter().position(|z| z.id == id) else {
            return Ok(false);
        };

        let mut next = zones.clone();
        if !next[index].release() {
            return Ok(false);
        }

        self.persist(&next).await?;
        *zones = next;
        Ok(true)
    }

    async fn delete_all(&self) -> Result<usize, StoreError> {
        let mut zones = self.zones.lock().await;
        let removed = zones.len();

        self.persist(&[]).await?;
        zones.clear();
        Ok(removed)
    }
}
