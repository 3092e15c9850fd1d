//! Player session.
//!
//! A session is a single actor task that owns all mutable game state for
//! one player. Location fixes, refresh results and purchase commands are
//! all funnelled into that task, so nothing else ever writes the state.
//!
//! ```text
//!  LocationSource ──fixes──►┐
//!                           │      ┌──────────────────┐
//!  SessionHandle ──cmds───► ├────► │ SessionController │ ──events──► subscribers
//!                           │      └────────┬─────────┘
//!  refresh tasks ──results─►┘               │ spawn (cancel + sequence)
//!                                           ▼
//!                                   VisibilityTracker
//! ```
//!
//! Each accepted fix cancels the in-flight refresh and starts a new one
//! tagged with a sequence number. Results from superseded refreshes are
//! dropped on arrival.

mod controller;
mod handle;
mod hints;
mod state;

#[cfg(test)]
mod tests;

pub use controller::{SessionConfig, SessionController};
pub use handle::SessionHandle;
pub use hints::{
    DeclineReason, HintCosts, HintEffect, HintKind, PurchaseOutcome, DEFAULT_HIGHLIGHT_COST,
    DEFAULT_REMOTE_COLLECT_COST, DEFAULT_SATELLITE_SCAN_COST,
};
pub use state::{SessionPhase, SessionSnapshot, SessionState};

use thiserror::Error;

use crate::collectible::Bone;
use crate::geo::GeoPoint;
use crate::profile::ProfileError;
use crate::store::StoreError;

/// Errors surfaced through [`SessionHandle`].
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session task has stopped
    #[error("Session closed")]
    Closed,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Profile(#[from] ProfileError),
}

/// Notifications broadcast by a session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    PhaseChanged(SessionPhase),
    /// A fix passed the jitter filter
    LocationAccepted { position: GeoPoint, sequence: u64 },
    /// A fix outside the WGS84 ranges was dropped
    LocationRejected { position: GeoPoint },
    /// The latest refresh was applied
    ZonesUpdated {
        sequence: u64,
        visible: usize,
        generated: bool,
    },
    /// The latest refresh failed; the previous visible set is kept
    RefreshFailed { sequence: u64, error: String },
    BoneCollected {
        zone_id: String,
        bone: Bone,
        remote: bool,
    },
    ZoneHighlighted { zone_id: String },
    BonesRevealed { zone_ids: Vec<String> },
}
