//! Collectible bones.
//!
//! Every collection awards one [`Bone`]. The part is drawn from a weighted
//! table (legendary parts are fifty times rarer than common ones) and the
//! species uniformly from a fixed roster.

use std::fmt;

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Image shown for every bone until per-part art exists.
pub const DEFAULT_IMAGE_REF: &str = "https://i.imgur.com/xwweStJ.png";

/// Rarity tier of a bone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// All tiers from most to least common.
    pub const ALL: [Rarity; 5] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
    ];

    /// Phrase used in descriptions, article included.
    pub fn adjective(self) -> &'static str {
        match self {
            Rarity::Common => "a common",
            Rarity::Uncommon => "an uncommon",
            Rarity::Rare => "a rare",
            Rarity::Epic => "a very rare",
            Rarity::Legendary => "a unique and extremely rare",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
        };
        f.write_str(name)
    }
}

/// A collected (or pre-revealed) bone. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    pub id: String,
    /// Display name, e.g. "Velociraptor Claw"
    pub name: String,
    /// Skeleton region the part belongs to
    pub kind: String,
    pub rarity: Rarity,
    pub image_ref: String,
    pub description: String,
    pub found_at: DateTime<Utc>,
}

struct PartTemplate {
    name: &'static str,
    kind: &'static str,
    rarity: Rarity,
    weight: u32,
}

const PARTS: [PartTemplate; 10] = [
    PartTemplate { name: "DNA", kind: "DNA", rarity: Rarity::Legendary, weight: 1 },
    PartTemplate { name: "Skull", kind: "Skull", rarity: Rarity::Epic, weight: 3 },
    PartTemplate { name: "Claw", kind: "Claw", rarity: Rarity::Epic, weight: 3 },
    PartTemplate { name: "Tooth", kind: "Tooth", rarity: Rarity::Rare, weight: 10 },
    PartTemplate { name: "Femur", kind: "Limb", rarity: Rarity::Rare, weight: 10 },
    PartTemplate { name: "Humerus", kind: "Limb", rarity: Rarity::Rare, weight: 10 },
    PartTemplate { name: "Rib", kind: "Torso", rarity: Rarity::Uncommon, weight: 25 },
    PartTemplate { name: "Scapula", kind: "Torso", rarity: Rarity::Uncommon, weight: 25 },
    PartTemplate { name: "Pelvis", kind: "Pelvis", rarity: Rarity::Common, weight: 50 },
    PartTemplate { name: "Vertebra", kind: "Spine", rarity: Rarity::Common, weight: 50 },
];

const SPECIES: [&str; 10] = [
    "Tyrannosaurus",
    "Triceratops",
    "Velociraptor",
    "Brachiosaurus",
    "Stegosaurus",
    "Spinosaurus",
    "Allosaurus",
    "Ankylosaurus",
    "Pterodactyl",
    "Deinonychus",
];

/// Draws random bones.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoneGenerator;

impl BoneGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Sum of all part weights.
    pub fn total_weight() -> u32 {
        PARTS.iter().map(|p| p.weight).sum()
    }

    /// Generates a bone using the thread-local RNG.
    pub fn generate(&self) -> Bone {
        self.generate_with(&mut rand::thread_rng())
    }

    /// Generates a bone using the supplied RNG.
    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Bone {
        let part = Self::pick_part(rng.gen_range(0..Self::total_weight()));
        let species = SPECIES.choose(rng).copied().unwrap_or(SPECIES[0]);
        let now = Utc::now();

        let name = format!("{} {}", species, part.name);
        let description = format!(
            "An ancient dinosaur bone unearthed during the dig. This {} is {} find!",
            name,
            part.rarity.adjective()
        );

        Bone {
            id: format!("bone_{}_{}", now.timestamp_millis(), rng.gen_range(0..10_000)),
            name,
            kind: part.kind.to_string(),
            rarity: part.rarity,
            image_ref: DEFAULT_IMAGE_REF.to_string(),
            description,
            found_at: now,
        }
    }

    /// Maps a roll in `0..total_weight()` onto the part table.
    fn pick_part(mut roll: u32) -> &'static PartTemplate {
        for part in &PARTS {
            if roll < part.weight {
                return part;
            }
            roll -= part.weight;
        }
        &PARTS[PARTS.len() - 1]
    }
}
