//! Tests for the session actor

use super::*;
use crate::geo::{destination_point, GeoPoint};
use crate::collectible::Bone;
use crate::inventory::{InventoryStore, MemoryInventory};
use crate::location::{ChannelLocationSource, LocationSender, PlayerLocation};
use crate::profile::{MemoryProfileStore, ProfileStore};
use crate::road::{PassthroughSnapper, RoadSnapClient, RoadSnapError};
use crate::store::{MemoryZoneStore, StoreError, ZoneStore};
use crate::visibility::VisibilityTracker;
use crate::generator::ZoneGenerator;
use crate::geo::BoundingBox;
use crate::zone::Zone;

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const ORIGIN: GeoPoint = GeoPoint::new(40.0, -74.0);

// ─────────────────────────────────────────────────────────────────────────
// Test doubles
// ─────────────────────────────────────────────────────────────────────────

struct NoRoads;

impl RoadSnapClient for NoRoads {
    async fn snap_to_road(&self, _point: GeoPoint) -> Result<Option<GeoPoint>, RoadSnapError> {
        Ok(None)
    }
}

/// Zone store whose collection writes always fail.
struct ReadOnlyStore(MemoryZoneStore);

impl ZoneStore for ReadOnlyStore {
    async fn zones_in_bounding_box(&self, bbox: &BoundingBox) -> Result<Vec<Zone>, StoreError> {
        self.0.zones_in_bounding_box(bbox).await
    }

    async fn all(&self) -> Result<Vec<Zone>, StoreError> {
        self.0.all().await
    }

    async fn insert_all(&self, zones: Vec<Zone>) -> Result<(), StoreError> {
        self.0.insert_all(zones).await
    }

    async fn mark_collected(&self, _id: &str, _at: DateTime<Utc>) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("read-only".to_string()))
    }

    async fn release_collected(&self, _id: &str) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("read-only".to_string()))
    }

    async fn delete_all(&self) -> Result<usize, StoreError> {
        self.0.delete_all().await
    }
}

/// Inventory that refuses every write.
struct FullInventory;

impl InventoryStore for FullInventory {
    async fn add(&self, _bone: Bone) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("inventory full".to_string()))
    }

    async fn all(&self) -> Result<Vec<Bone>, StoreError> {
        Ok(Vec::new())
    }
}

struct Harness {
    handle: SessionHandle,
    events: broadcast::Receiver<SessionEvent>,
    sender: LocationSender,
    profile: Arc<MemoryProfileStore>,
    inventory: Arc<MemoryInventory>,
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

fn start<S: ZoneStore, R: RoadSnapClient>(store: Arc<S>, snapper: R, balance: u64) -> Harness {
    let profile = Arc::new(MemoryProfileStore::with_balance(balance));
    let inventory = Arc::new(MemoryInventory::new());
    let tracker = VisibilityTracker::new(store, Arc::new(ZoneGenerator::new(snapper)));

    let controller = SessionController::new(
        tracker,
        Arc::clone(&profile),
        Arc::clone(&inventory),
        SessionConfig::default(),
    );
    let events = controller.subscribe();

    let (source, sender) = ChannelLocationSource::new();
    let source = source.with_last_known(ORIGIN.into());
    let shutdown = CancellationToken::new();
    let (handle, task) = controller.spawn(source, shutdown.clone());

    Harness {
        handle,
        events,
        sender,
        profile,
        inventory,
        shutdown,
        task,
    }
}

fn zone_at(id: &str, bearing: f64, distance: f64) -> Zone {
    let p = destination_point(ORIGIN, bearing, distance);
    Zone::new(id, p, 100.0, p)
}

async fn wait_for<F>(events: &mut broadcast::Receiver<SessionEvent>, mut matches: F) -> SessionEvent
where
    F: FnMut(&SessionEvent) -> bool,
{
    let wait = async {
        loop {
            match events.recv().await {
                Ok(event) if matches(&event) => return event,
                Ok(_) | Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => panic!("event channel closed"),
            }
        }
    };
    tokio::time::timeout(Duration::from_secs(5), wait)
        .await
        .expect("timed out waiting for session event")
}

async fn wait_for_zones(events: &mut broadcast::Receiver<SessionEvent>) -> SessionEvent {
    wait_for(events, |e| matches!(e, SessionEvent::ZonesUpdated { .. })).await
}

// ─────────────────────────────────────────────────────────────────────────
// Lifecycle
// ─────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_fast_path_activates_and_refreshes() {
    let store = Arc::new(MemoryZoneStore::with_zones(vec![zone_at("a", 0.0, 300.0)]));
    let mut h = start(store, PassthroughSnapper, 0);

    wait_for(&mut h.events, |e| {
        *e == SessionEvent::PhaseChanged(SessionPhase::Active)
    })
    .await;
    let event = wait_for_zones(&mut h.events).await;
    assert_eq!(
        event,
        SessionEvent::ZonesUpdated {
            sequence: 1,
            visible: 1,
            generated: false
        }
    );

    let snapshot = h.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.phase, SessionPhase::Active);
    assert_eq!(snapshot.location, Some(ORIGIN));
    assert_eq!(snapshot.visible_zones.len(), 1);
    assert_eq!(snapshot.sequence, 1);
}

#[tokio::test]
async fn test_empty_area_is_backfilled() {
    let store = Arc::new(MemoryZoneStore::new());
    let mut h = start(Arc::clone(&store), PassthroughSnapper, 0);

    let event = wait_for_zones(&mut h.events).await;
    assert_eq!(
        event,
        SessionEvent::ZonesUpdated {
            sequence: 1,
            visible: 10,
            generated: true
        }
    );
    assert_eq!(store.len(), 10);
}

#[tokio::test]
async fn test_jitter_fix_is_skipped() {
    let store = Arc::new(MemoryZoneStore::with_zones(vec![zone_at("a", 0.0, 300.0)]));
    let mut h = start(store, PassthroughSnapper, 0);
    wait_for_zones(&mut h.events).await;

    let wobble = destination_point(ORIGIN, 90.0, 4.0);
    let step = destination_point(ORIGIN, 90.0, 50.0);
    assert!(h.sender.send(wobble.into()).await);
    assert!(h.sender.send(step.into()).await);

    let event = wait_for(&mut h.events, |e| {
        matches!(e, SessionEvent::LocationAccepted { sequence: 2, .. })
    })
    .await;
    assert_eq!(
        event,
        SessionEvent::LocationAccepted {
            position: step,
            sequence: 2
        }
    );
}

#[tokio::test]
async fn test_out_of_range_fix_is_rejected() {
    let store = Arc::new(MemoryZoneStore::with_zones(vec![zone_at("a", 0.0, 300.0)]));
    let mut h = start(store, PassthroughSnapper, 0);
    wait_for_zones(&mut h.events).await;

    let bogus = GeoPoint::new(95.0, -74.0);
    assert!(h.sender.send(bogus.into()).await);

    let event = wait_for(&mut h.events, |e| {
        matches!(e, SessionEvent::LocationRejected { .. })
    })
    .await;
    assert_eq!(event, SessionEvent::LocationRejected { position: bogus });

    let snapshot = h.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.location, Some(ORIGIN));
    assert_eq!(snapshot.sequence, 1);

    // A bad fix must not become the jitter baseline either
    let step = destination_point(ORIGIN, 0.0, 50.0);
    assert!(h.sender.send(step.into()).await);
    wait_for(&mut h.events, |e| {
        matches!(e, SessionEvent::LocationAccepted { sequence: 2, .. })
    })
    .await;
}

#[tokio::test]
async fn test_shutdown_closes_handle() {
    let store = Arc::new(MemoryZoneStore::new());
    let h = start(store, NoRoads, 0);

    h.shutdown.cancel();
    h.task.await.unwrap();

    assert!(matches!(
        h.handle.snapshot().await,
        Err(SessionError::Closed)
    ));
    assert!(h.handle.is_closed());
}

// ─────────────────────────────────────────────────────────────────────────
// Collection
// ─────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_walking_onto_hidden_point_collects() {
    let zone = zone_at("target", 0.0, 100.0);
    let hidden = zone.hidden_point();
    let store = Arc::new(MemoryZoneStore::with_zones(vec![zone]));
    let mut h = start(Arc::clone(&store), PassthroughSnapper, 0);
    wait_for_zones(&mut h.events).await;

    assert!(h.sender.send(PlayerLocation::from(hidden)).await);

    let event = wait_for(&mut h.events, |e| {
        matches!(e, SessionEvent::BoneCollected { .. })
    })
    .await;
    match event {
        SessionEvent::BoneCollected {
            zone_id, remote, ..
        } => {
            assert_eq!(zone_id, "target");
            assert!(!remote);
        }
        other => panic!("unexpected event {:?}", other),
    }

    assert_eq!(h.inventory.len(), 1);
    assert!(store.get("target").unwrap().is_collected);

    let snapshot = h.handle.snapshot().await.unwrap();
    assert!(snapshot.visible_zones[0].is_collected);
}

#[tokio::test]
async fn test_already_collected_zone_awards_nothing() {
    let mut zone = zone_at("done", 0.0, 0.0);
    zone.collect(Utc::now());
    let store = Arc::new(MemoryZoneStore::with_zones(vec![zone]));
    let mut h = start(store, PassthroughSnapper, 0);

    wait_for_zones(&mut h.events).await;
    // Round-trip a command so the post-refresh check has run
    h.handle.snapshot().await.unwrap();

    assert!(h.inventory.is_empty());
}

// ─────────────────────────────────────────────────────────────────────────
// Hints
// ─────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_highlight_then_remote_collect() {
    let store = Arc::new(MemoryZoneStore::with_zones(vec![
        zone_at("far", 180.0, 600.0),
        zone_at("near", 0.0, 300.0),
    ]));
    let mut h = start(Arc::clone(&store), PassthroughSnapper, 1500);
    wait_for_zones(&mut h.events).await;

    let outcome = h.handle.purchase(HintKind::Highlight).await.unwrap();
    assert_eq!(
        outcome,
        PurchaseOutcome::Applied(HintEffect::Highlighted {
            zone_id: "near".to_string()
        })
    );
    assert_eq!(h.profile.balance().await.unwrap(), 1000);

    let outcome = h.handle.purchase(HintKind::RemoteCollect).await.unwrap();
    match outcome {
        PurchaseOutcome::Applied(HintEffect::Collected { zone_id, .. }) => {
            assert_eq!(zone_id, "near")
        }
        other => panic!("unexpected outcome {:?}", other),
    }

    assert_eq!(h.profile.balance().await.unwrap(), 0);
    assert_eq!(h.inventory.len(), 1);
    assert!(store.get("near").unwrap().is_collected);
    assert!(h.handle.snapshot().await.unwrap().highlighted_zone.is_none());
}

#[tokio::test]
async fn test_insufficient_funds_leaves_balance() {
    let store = Arc::new(MemoryZoneStore::with_zones(vec![zone_at("a", 45.0, 300.0)]));
    let mut h = start(Arc::clone(&store), PassthroughSnapper, 500);
    wait_for_zones(&mut h.events).await;

    let outcome = h.handle.purchase(HintKind::RemoteCollect).await.unwrap();

    assert_eq!(
        outcome,
        PurchaseOutcome::Declined(DeclineReason::InsufficientFunds {
            balance: 500,
            cost: 1000
        })
    );
    assert_eq!(h.profile.balance().await.unwrap(), 500);
    assert!(!store.get("a").unwrap().is_collected);
    assert!(h.inventory.is_empty());
}

#[tokio::test]
async fn test_no_target_is_not_charged() {
    let store = Arc::new(MemoryZoneStore::new());
    let mut h = start(store, NoRoads, 5000);

    let event = wait_for_zones(&mut h.events).await;
    assert!(matches!(
        event,
        SessionEvent::ZonesUpdated { visible: 0, .. }
    ));

    for kind in [
        HintKind::Highlight,
        HintKind::RemoteCollect,
        HintKind::SatelliteScan,
    ] {
        let outcome = h.handle.purchase(kind).await.unwrap();
        assert_eq!(outcome, PurchaseOutcome::Declined(DeclineReason::NoTarget));
    }
    assert_eq!(h.profile.balance().await.unwrap(), 5000);
}

#[tokio::test]
async fn test_failed_remote_collect_is_refunded() {
    let store = Arc::new(ReadOnlyStore(MemoryZoneStore::with_zones(vec![zone_at(
        "a", 90.0, 250.0,
    )])));
    let mut h = start(store, PassthroughSnapper, 2000);
    wait_for_zones(&mut h.events).await;

    let outcome = h.handle.purchase(HintKind::RemoteCollect).await.unwrap();

    assert!(matches!(
        outcome,
        PurchaseOutcome::Declined(DeclineReason::Refunded { cost: 1000, .. })
    ));
    assert_eq!(h.profile.balance().await.unwrap(), 2000);
    assert!(h.inventory.is_empty());
}

#[tokio::test]
async fn test_scan_reveals_bone_that_is_later_collected() {
    let zone = zone_at("a", 270.0, 200.0);
    let hidden = zone.hidden_point();
    let store = Arc::new(MemoryZoneStore::with_zones(vec![zone]));
    let mut h = start(store, PassthroughSnapper, 1500);
    wait_for_zones(&mut h.events).await;

    let outcome = h.handle.purchase(HintKind::SatelliteScan).await.unwrap();
    assert_eq!(
        outcome,
        PurchaseOutcome::Applied(HintEffect::Scanned {
            zone_ids: vec!["a".to_string()]
        })
    );
    let revealed = h.handle.snapshot().await.unwrap().revealed["a"].clone();

    // Scanning again has nothing new to reveal
    let again = h.handle.purchase(HintKind::SatelliteScan).await.unwrap();
    assert_eq!(again, PurchaseOutcome::Declined(DeclineReason::NoTarget));
    assert_eq!(h.profile.balance().await.unwrap(), 0);

    assert!(h.sender.send(PlayerLocation::from(hidden)).await);
    let event = wait_for(&mut h.events, |e| {
        matches!(e, SessionEvent::BoneCollected { .. })
    })
    .await;

    match event {
        SessionEvent::BoneCollected { bone, .. } => assert_eq!(bone, revealed),
        other => panic!("unexpected event {:?}", other),
    }
    assert!(h.handle.snapshot().await.unwrap().revealed.is_empty());
}

#[tokio::test]
async fn test_inventory_failure_releases_zone() {
    let store = Arc::new(MemoryZoneStore::with_zones(vec![zone_at("a", 90.0, 250.0)]));
    let profile = Arc::new(MemoryProfileStore::with_balance(2500));
    let tracker = VisibilityTracker::new(
        Arc::clone(&store),
        Arc::new(ZoneGenerator::new(PassthroughSnapper)),
    );
    let controller = SessionController::new(
        tracker,
        Arc::clone(&profile),
        Arc::new(FullInventory),
        SessionConfig::default(),
    );
    let mut events = controller.subscribe();
    let (source, _sender) = ChannelLocationSource::new();
    let shutdown = CancellationToken::new();
    let (handle, _task) = controller.spawn(source.with_last_known(ORIGIN.into()), shutdown.clone());
    wait_for_zones(&mut events).await;

    let scan = handle.purchase(HintKind::SatelliteScan).await.unwrap();
    assert!(matches!(scan, PurchaseOutcome::Applied(_)));

    let outcome = handle.purchase(HintKind::RemoteCollect).await.unwrap();
    assert!(matches!(
        outcome,
        PurchaseOutcome::Declined(DeclineReason::Refunded { cost: 1000, .. })
    ));
    assert_eq!(profile.balance().await.unwrap(), 1000);

    // The claim was rolled back and the scanned bone is still waiting
    assert!(!store.get("a").unwrap().is_collected);
    let snapshot = handle.snapshot().await.unwrap();
    assert!(!snapshot.visible_zones[0].is_collected);
    assert!(snapshot.revealed.contains_key("a"));

    shutdown.cancel();
}
