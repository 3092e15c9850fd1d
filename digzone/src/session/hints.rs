//! Paid hints.

use std::fmt;

use crate::collectible::Bone;

/// Default cost of highlighting the nearest zone.
pub const DEFAULT_HIGHLIGHT_COST: u64 = 500;

/// Default cost of collecting a zone without walking to it.
pub const DEFAULT_REMOTE_COLLECT_COST: u64 = 1000;

/// Default cost of revealing the bones in every visible zone.
pub const DEFAULT_SATELLITE_SCAN_COST: u64 = 1500;

/// Hints a player can buy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HintKind {
    /// Mark the nearest uncollected visible zone
    Highlight,
    /// Collect the highlighted (or nearest) zone from afar
    RemoteCollect,
    /// Reveal the bone waiting in every uncollected visible zone
    SatelliteScan,
}

impl fmt::Display for HintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HintKind::Highlight => write!(f, "highlight"),
            HintKind::RemoteCollect => write!(f, "remote-collect"),
            HintKind::SatelliteScan => write!(f, "satellite-scan"),
        }
    }
}

/// Price list for hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HintCosts {
    pub highlight: u64,
    pub remote_collect: u64,
    pub satellite_scan: u64,
}

impl Default for HintCosts {
    fn default() -> Self {
        Self {
            highlight: DEFAULT_HIGHLIGHT_COST,
            remote_collect: DEFAULT_REMOTE_COLLECT_COST,
            satellite_scan: DEFAULT_SATELLITE_SCAN_COST,
        }
    }
}

impl HintCosts {
    pub fn cost(&self, kind: HintKind) -> u64 {
        match kind {
            HintKind::Highlight => self.highlight,
            HintKind::RemoteCollect => self.remote_collect,
            HintKind::SatelliteScan => self.satellite_scan,
        }
    }
}

/// What a successful purchase did.
#[derive(Debug, Clone, PartialEq)]
pub enum HintEffect {
    Highlighted { zone_id: String },
    Collected { zone_id: String, bone: Bone },
    Scanned { zone_ids: Vec<String> },
}

/// Why a purchase did not go through.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclineReason {
    /// Nothing to apply the hint to; nothing was charged
    NoTarget,
    /// Balance too low; nothing was charged
    InsufficientFunds { balance: u64, cost: u64 },
    /// The effect failed after charging and the cost was credited back
    Refunded { cost: u64, reason: String },
}

impl fmt::Display for DeclineReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclineReason::NoTarget => write!(f, "no zone to apply the hint to"),
            DeclineReason::InsufficientFunds { balance, cost } => {
                write!(f, "insufficient funds: balance {} < cost {}", balance, cost)
            }
            DeclineReason::Refunded { cost, reason } => {
                write!(f, "refunded {} after failure: {}", cost, reason)
            }
        }
    }
}

/// Result of [`SessionHandle::purchase`](super::SessionHandle::purchase).
#[derive(Debug, Clone, PartialEq)]
pub enum PurchaseOutcome {
    Applied(HintEffect),
    Declined(DeclineReason),
}

impl PurchaseOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, PurchaseOutcome::Applied(_))
    }
}
