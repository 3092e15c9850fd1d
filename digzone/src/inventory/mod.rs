//! Player inventory of collected bones.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use crate::collectible::{Bone, Rarity};
use crate::store::StoreError;

/// Persistence for collected bones.
pub trait InventoryStore: Send + Sync + 'static {
    /// Appends a bone.
    fn add(&self, bone: Bone) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Returns every bone in collection order.
    fn all(&self) -> impl Future<Output = Result<Vec<Bone>, StoreError>> + Send;
}

impl<T: InventoryStore> InventoryStore for Arc<T> {
    fn add(&self, bone: Bone) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).add(bone)
    }

    fn all(&self) -> impl Future<Output = Result<Vec<Bone>, StoreError>> + Send {
        (**self).all()
    }
}

/// In-process inventory.
#[derive(Debug, Default)]
pub struct MemoryInventory {
    bones: Mutex<Vec<Bone>>,
}

impl MemoryInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bones.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.lock().is_empty()
    }

    pub fn summary(&self) -> InventorySummary {
        InventorySummary::from_bones(&self.bones.lock())
    }
}

impl InventoryStore for MemoryInventory {
    async fn add(&self, bone: Bone) -> Result<(), StoreError> {
        self.bones.lock().push(bone);
        Ok(())
    }

    async fn all(&self) -> Result<Vec<Bone>, StoreError> {
        Ok(self.bones.lock().clone())
    }
}

/// Identical bones stacked together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoneStack {
    pub name: String,
    pub kind: String,
    pub rarity: Rarity,
    pub image_ref: String,
    pub count: usize,
}

/// Inventory grouped for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InventorySummary {
    /// Stacks ordered rarest first, then by name
    pub stacks: Vec<BoneStack>,
    pub by_rarity: BTreeMap<Rarity, usize>,
    pub total: usize,
}

impl InventorySummary {
    pub fn from_bones(bones: &[Bone]) -> Self {
        let mut stacks: BTreeMap<(Rarity, &str, &str, &str), usize> = BTreeMap::new();
        let mut by_rarity = BTreeMap::new();

        for bone in bones {
            *stacks
                .entry((
                    bone.rarity,
                    bone.name.as_str(),
                    bone.kind.as_str(),
                    bone.image_ref.as_str(),
                ))
                .or_default() += 1;
            *by_rarity.entry(bone.rarity).or_default() += 1;
        }

        let mut stacks: Vec<BoneStack> = stacks
            .into_iter()
            .map(|((rarity, name, kind, image_ref), count)| BoneStack {
                name: name.to_string(),
                kind: kind.to_string(),
                rarity,
                image_ref: image_ref.to_string(),
                count,
            })
            .collect();
        stacks.sort_by(|a, b| b.rarity.cmp(&a.rarity).then_with(|| a.name.cmp(&b.name)));

        Self {
            stacks,
            by_rarity,
            total: bones.len(),
        }
    }

    pub fn count(&self, rarity: Rarity) -> usize {
        self.by_rarity.get(&rarity).copied().unwrap_or(0)
    }
}
