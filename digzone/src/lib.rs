//! DigZone - a location-based dig game engine
//!
//! Players walk around the real world. Hidden bones are buried inside
//! circular zones scattered along nearby roads; walking close enough to a
//! zone's hidden point digs the bone up into the player's inventory.
//!
//! # High-Level API
//!
//! The [`session`] module ties everything together:
//!
//! ```ignore
//! use std::sync::Arc;
//! use digzone::generator::ZoneGenerator;
//! use digzone::road::PassthroughSnapper;
//! use digzone::session::{SessionConfig, SessionController};
//! use digzone::store::MemoryZoneStore;
//! use digzone::visibility::VisibilityTracker;
//!
//! let tracker = VisibilityTracker::new(
//!     Arc::new(MemoryZoneStore::new()),
//!     Arc::new(ZoneGenerator::new(PassthroughSnapper)),
//! );
//! let controller = SessionController::new(tracker, profile, inventory, SessionConfig::default());
//! let (handle, task) = controller.spawn(location_source, shutdown.clone());
//! ```

pub mod collectible;
pub mod collection;
pub mod config;
pub mod generator;
pub mod geo;
pub mod inventory;
pub mod jobs;
pub mod location;
pub mod logging;
pub mod profile;
pub mod road;
pub mod session;
pub mod store;
pub mod visibility;
pub mod zone;

/// Version of the DigZone library and CLI.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
