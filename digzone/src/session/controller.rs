//! Session actor.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::handle::Command;
use super::{
    DeclineReason, HintCosts, HintEffect, HintKind, PurchaseOutcome, SessionError, SessionEvent,
    SessionHandle, SessionPhase, SessionState,
};
use crate::collectible::{Bone, BoneGenerator};
use crate::collection::CollectionDetector;
use crate::inventory::InventoryStore;
use crate::location::{
    JitterFilter, LocationSource, PlayerLocation, DEFAULT_MIN_MOVEMENT_M, DEFAULT_UPDATE_INTERVAL,
};
use crate::profile::{DebitOutcome, ProfileStore};
use crate::road::RoadSnapClient;
use crate::store::ZoneStore;
use crate::visibility::{Refresh, VisibilityError, VisibilityTracker};
use crate::zone::DEFAULT_COLLECTION_RADIUS_M;

/// Capacity of the handle command channel.
pub const DEFAULT_COMMAND_BUFFER: usize = 32;

/// Capacity of the event broadcast channel.
pub const DEFAULT_EVENT_BUFFER: usize = 256;

/// Session tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub collection_radius_m: f64,
    /// Fixes closer than this to the last accepted one are ignored
    pub min_movement_m: f64,
    /// Interval requested from the location source
    pub update_interval: Duration,
    pub hint_costs: HintCosts,
    pub event_buffer: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            collection_radius_m: DEFAULT_COLLECTION_RADIUS_M,
            min_movement_m: DEFAULT_MIN_MOVEMENT_M,
            update_interval: DEFAULT_UPDATE_INTERVAL,
            hint_costs: HintCosts::default(),
            event_buffer: DEFAULT_EVENT_BUFFER,
        }
    }
}

/// Result of a background refresh, tagged with the fix it was started for.
struct RefreshDone {
    sequence: u64,
    result: Result<Refresh, VisibilityError>,
}

/// Owns the state of one player session.
///
/// Build it, optionally [`subscribe`](Self::subscribe) to events, then
/// [`spawn`](Self::spawn) it onto the runtime.
pub struct SessionController<S, R, P, I>
where
    S: ZoneStore,
    R: RoadSnapClient,
    P: ProfileStore,
    I: InventoryStore,
{
    tracker: VisibilityTracker<S, R>,
    profile: Arc<P>,
    inventory: Arc<I>,
    detector: CollectionDetector,
    bones: BoneGenerator,
    config: SessionConfig,
    events: broadcast::Sender<SessionEvent>,
    state: SessionState,
    /// Sequence number of the latest accepted fix
    sequence: u64,
    inflight: Option<CancellationToken>,
}

impl<S, R, P, I> SessionController<S, R, P, I>
where
    S: ZoneStore,
    R: RoadSnapClient,
    P: ProfileStore,
    I: InventoryStore,
{
    pub fn new(
        tracker: VisibilityTracker<S, R>,
        profile: Arc<P>,
        inventory: Arc<I>,
        config: SessionConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(config.event_buffer.max(1));
        Self {
            tracker,
            profile,
            inventory,
            detector: CollectionDetector::new(config.collection_radius_m),
            bones: BoneGenerator::new(),
            config,
            events,
            state: SessionState::default(),
            sequence: 0,
            inflight: None,
        }
    }

    /// Subscribes to events, including those emitted during startup.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Starts the session task.
    ///
    /// The task runs until `shutdown` is cancelled.
    pub fn spawn<L: LocationSource>(
        self,
        location: L,
        shutdown: CancellationToken,
    ) -> (SessionHandle, JoinHandle<()>) {
        let (command_tx, command_rx) = mpsc::channel(DEFAULT_COMMAND_BUFFER);
        let handle = SessionHandle::new(command_tx, self.events.clone());
        let task = tokio::spawn(self.run(location, command_rx, shutdown));
        (handle, task)
    }

    async fn run<L: LocationSource>(
        mut self,
        location: L,
        mut commands: mpsc::Receiver<Command>,
        shutdown: CancellationToken,
    ) {
        info!(
            aura_m = self.tracker.aura_radius_m(),
            collection_radius_m = self.config.collection_radius_m,
            min_movement_m = self.config.min_movement_m,
            "Session started"
        );

        let (refresh_tx, mut refresh_rx) = mpsc::channel(4);
        let mut jitter = JitterFilter::new(self.config.min_movement_m);
        self.set_phase(SessionPhase::Initializing);

        // Fast path: act on the cached fix before the stream produces one
        if let Some(fix) = location.last_known().await {
            if self.validate(&fix) && jitter.accept(&fix) {
                self.on_location(fix, &refresh_tx, &shutdown).await;
            }
        }

        let mut updates = location.updates(self.config.update_interval);
        let mut updates_open = true;
        let mut commands_open = true;

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => break,

                Some(done) = refresh_rx.recv() => self.on_refresh(done).await,

                command = commands.recv(), if commands_open => match command {
                    Some(command) => self.on_command(command).await,
                    None => commands_open = false,
                },

                fix = updates.recv(), if updates_open => match fix {
                    Some(fix) if !self.validate(&fix) => {}
                    Some(fix) if jitter.accept(&fix) => {
                        self.on_location(fix, &refresh_tx, &shutdown).await;
                    }
                    Some(fix) => {
                        debug!(lat = fix.lat, lng = fix.lng, "Fix within jitter threshold, skipped");
                    }
                    None => {
                        debug!("Location stream ended");
                        updates_open = false;
                    }
                },
            }
        }

        if let Some(token) = self.inflight.take() {
            token.cancel();
        }
        info!(sequence = self.sequence, "Session stopped");
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is not an error
        let _ = self.events.send(event);
    }

    fn set_phase(&mut self, phase: SessionPhase) {
        if self.state.phase != phase {
            self.state.phase = phase;
            self.emit(SessionEvent::PhaseChanged(phase));
        }
    }

    /// Drops fixes that are not real coordinates before they reach state.
    fn validate(&self, fix: &PlayerLocation) -> bool {
        let position = fix.point();
        if position.is_valid() {
            return true;
        }
        warn!(lat = fix.lat, lng = fix.lng, "Rejected out-of-range location fix");
        self.emit(SessionEvent::LocationRejected { position });
        false
    }

    async fn on_location(
        &mut self,
        fix: PlayerLocation,
        refresh_tx: &mpsc::Sender<RefreshDone>,
        shutdown: &CancellationToken,
    ) {
        self.sequence += 1;
        let sequence = self.sequence;

        self.state.location = Some(fix);
        self.set_phase(SessionPhase::Active);
        self.emit(SessionEvent::LocationAccepted {
            position: fix.point(),
            sequence,
        });

        self.check_collection().await;

        if let Some(previous) = self.inflight.take() {
            previous.cancel();
        }
        let token = shutdown.child_token();
        self.inflight = Some(token.clone());

        let tracker = self.tracker.clone();
        let tx = refresh_tx.clone();
        let point = fix.point();
        tokio::spawn(async move {
            let result = tracker.refresh(point, &token).await;
            // Receiver is gone once the session stops
            let _ = tx.send(RefreshDone { sequence, result }).await;
        });
    }

    async fn on_refresh(&mut self, done: RefreshDone) {
        if done.sequence != self.sequence {
            debug!(
                sequence = done.sequence,
                latest = self.sequence,
                "Discarding superseded refresh"
            );
            return;
        }
        self.inflight = None;

        match done.result {
            Ok(refresh) => {
                debug!(
                    sequence = done.sequence,
                    visible = refresh.zones.len(),
                    generated = refresh.generated,
                    "Refresh applied"
                );
                let visible = refresh.zones.len();
                self.state.visible_zones = refresh.zones;
                self.state.prune_highlight();
                self.emit(SessionEvent::ZonesUpdated {
                    sequence: done.sequence,
                    visible,
                    generated: refresh.generated,
                });
                self.check_collection().await;
            }
            Err(e) => {
                warn!(sequence = done.sequence, error = %e, "Zone refresh failed");
                self.emit(SessionEvent::RefreshFailed {
                    sequence: done.sequence,
                    error: e.to_string(),
                });
            }
        }
    }

    async fn on_command(&mut self, command: Command) {
        match command {
            Command::Purchase { kind, reply } => {
                let result = self.purchase(kind).await;
                let _ = reply.send(result);
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.state.snapshot(self.sequence));
            }
        }
    }

    /// Collects the zone the player is standing on, if any.
    async fn check_collection(&mut self) {
        let Some(position) = self.state.position() else {
            return;
        };
        let Some(zone_id) = self
            .detector
            .check_collection(&position, &self.state.visible_zones)
            .map(|z| z.id.clone())
        else {
            return;
        };

        if let Err(e) = self.collect_zone(&zone_id, false).await {
            warn!(zone_id = %zone_id, error = %e, "Collection failed");
        }
    }

    /// Claims a zone in the store and awards its bone.
    ///
    /// Returns `Ok(None)` if another writer claimed the zone first. If the
    /// bone cannot be stored the claim is released and session state is
    /// left untouched.
    async fn collect_zone(
        &mut self,
        zone_id: &str,
        remote: bool,
    ) -> Result<Option<Bone>, SessionError> {
        let now = Utc::now();
        let store = Arc::clone(self.tracker.store());

        if !store.mark_collected(zone_id, now).await? {
            debug!(zone_id, "Zone already collected");
            self.state.settle_collected(zone_id, now);
            return Ok(None);
        }

        let bone = match self.state.revealed.get(zone_id) {
            Some(bone) => bone.clone(),
            None => self.bones.generate(),
        };

        if let Err(e) = self.inventory.add(bone.clone()).await {
            match store.release_collected(zone_id).await {
                Ok(_) => debug!(zone_id, "Claim released after inventory failure"),
                Err(release) => {
                    warn!(zone_id, error = %release, "Could not release claim, zone is lost")
                }
            }
            return Err(e.into());
        }
        self.state.settle_collected(zone_id, now);

        info!(
            zone_id,
            bone = %bone.name,
            rarity = %bone.rarity,
            remote,
            "Bone collected"
        );
        self.emit(SessionEvent::BoneCollected {
            zone_id: zone_id.to_string(),
            bone: bone.clone(),
            remote,
        });
        Ok(Some(bone))
    }

    fn hint_targets(&self, kind: HintKind) -> Vec<String> {
        let state = &self.state;
        match kind {
            HintKind::Highlight => state
                .nearest_uncollected()
                .map(|z| z.id.clone())
                .into_iter()
                .collect(),
            HintKind::RemoteCollect => state
                .highlighted_zone
                .clone()
                .filter(|id| state.zone(id).is_some_and(|z| !z.is_collected))
                .or_else(|| state.nearest_uncollected().map(|z| z.id.clone()))
                .into_iter()
                .collect(),
            HintKind::SatelliteScan => state
                .visible_zones
                .iter()
                .filter(|z| !z.is_collected && !state.revealed.contains_key(&z.id))
                .map(|z| z.id.clone())
                .collect(),
        }
    }

    async fn purchase(&mut self, kind: HintKind) -> Result<PurchaseOutcome, SessionError> {
        let cost = self.config.hint_costs.cost(kind);
        let mut targets = self.hint_targets(kind);

        if targets.is_empty() {
            debug!(hint = %kind, "Hint declined, no target");
            return Ok(PurchaseOutcome::Declined(DeclineReason::NoTarget));
        }

        match self.profile.try_debit(cost).await? {
            DebitOutcome::Insufficient { balance } => {
                info!(hint = %kind, balance, cost, "Hint declined, insufficient funds");
                return Ok(PurchaseOutcome::Declined(
                    DeclineReason::InsufficientFunds { balance, cost },
                ));
            }
            DebitOutcome::Debited { remaining } => {
                debug!(hint = %kind, cost, remaining, "Hint charged");
            }
        }

        let effect = match kind {
            HintKind::Highlight => {
                let zone_id = targets.remove(0);
                self.state.highlighted_zone = Some(zone_id.clone());
                self.emit(SessionEvent::ZoneHighlighted {
                    zone_id: zone_id.clone(),
                });
                HintEffect::Highlighted { zone_id }
            }
            HintKind::RemoteCollect => {
                let zone_id = targets.remove(0);
                match self.collect_zone(&zone_id, true).await {
                    Ok(Some(bone)) => HintEffect::Collected { zone_id, bone },
                    Ok(None) => {
                        return self
                            .refund(kind, cost, "zone was already collected".to_string())
                            .await;
                    }
                    Err(e) => {
                        warn!(zone_id = %zone_id, error = %e, "Remote collection failed");
                        return self.refund(kind, cost, e.to_string()).await;
                    }
                }
            }
            HintKind::SatelliteScan => {
                for zone_id in &targets {
                    let bone = self.bones.generate();
                    self.state.revealed.insert(zone_id.clone(), bone);
                }
                self.emit(SessionEvent::BonesRevealed {
                    zone_ids: targets.clone(),
                });
                HintEffect::Scanned { zone_ids: targets }
            }
        };

        info!(hint = %kind, cost, "Hint applied");
        Ok(PurchaseOutcome::Applied(effect))
    }

    async fn refund(
        &self,
        kind: HintKind,
        cost: u64,
        reason: String,
    ) -> Result<PurchaseOutcome, SessionError> {
        let balance = self.profile.credit(cost).await?;
        info!(hint = %kind, cost, balance, reason = %reason, "Hint refunded");
        Ok(PurchaseOutcome::Declined(DeclineReason::Refunded {
            cost,
            reason,
        }))
    }
}
