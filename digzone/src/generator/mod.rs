//! Zone placement.
//!
//! [`ZoneGenerator`] scatters non-overlapping zones around the player. Each
//! candidate is sampled uniformly inside the aura, snapped to a road, and
//! checked against every existing zone and every zone already accepted in
//! the batch. Generation never fails: wasted attempts are counted and the
//! batch may come back short.

use std::time::Duration;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio_util::sync::CancellationToken;
use tracing::{info, trace, warn};

use crate::geo::{self, GeoPoint};
use crate::road::RoadSnapClient;
use crate::store::{StoreError, ZoneStore};
use crate::zone::{self, Zone, DEFAULT_ZONE_RADIUS_M, HIDDEN_POINT_RATIO};

/// Default minimum center-to-center distance between zones in meters.
pub const DEFAULT_MIN_SEPARATION_M: f64 = 210.0;

/// Default radius around the player in which zones are placed and shown.
pub const DEFAULT_AURA_RADIUS_M: f64 = 1000.0;

/// Default number of zones per generation batch.
pub const DEFAULT_ZONES_PER_BATCH: usize = 10;

/// Default attempt ceiling per batch.
pub const DEFAULT_MAX_ATTEMPTS: usize = 500;

/// Default bound on a single road snap call.
pub const DEFAULT_SNAP_TIMEOUT: Duration = Duration::from_secs(10);

/// Tuning for zone placement.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneGeneratorConfig {
    /// Radius of each zone's visible boundary
    pub zone_radius_m: f64,
    /// Minimum distance between any two zone centers
    pub min_separation_m: f64,
    /// Radius around the player inside which candidates are sampled
    pub aura_radius_m: f64,
    /// Target batch size
    pub zones_per_batch: usize,
    /// Attempts before giving up on a short batch
    pub max_attempts: usize,
    /// Hidden points are placed within `zone_radius_m * hidden_point_ratio`
    pub hidden_point_ratio: f64,
    /// Upper bound on one road snap call
    pub snap_timeout: Duration,
}

impl Default for ZoneGeneratorConfig {
    fn default() -> Self {
        Self {
            zone_radius_m: DEFAULT_ZONE_RADIUS_M,
            min_separation_m: DEFAULT_MIN_SEPARATION_M,
            aura_radius_m: DEFAULT_AURA_RADIUS_M,
            zones_per_batch: DEFAULT_ZONES_PER_BATCH,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            hidden_point_ratio: HIDDEN_POINT_RATIO,
            snap_timeout: DEFAULT_SNAP_TIMEOUT,
        }
    }
}

/// Outcome of one generation batch.
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    /// Accepted zones, in acceptance order
    pub zones: Vec<Zone>,
    /// Candidates sampled
    pub attempts: usize,
    /// Snap calls that errored or timed out
    pub snap_failures: usize,
    /// Snap calls that found no road
    pub unsnapped: usize,
    /// Candidates rejected for being too close to another zone
    pub overlaps: usize,
    /// Generation stopped because the token was cancelled
    pub cancelled: bool,
}

impl GenerationReport {
    /// Number of zones accepted.
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

/// Places zones around a player.
pub struct ZoneGenerator<R: RoadSnapClient> {
    snapper: R,
    config: ZoneGeneratorConfig,
}

impl<R: RoadSnapClient> ZoneGenerator<R> {
    /// Creates a generator with default tuning.
    pub fn new(snapper: R) -> Self {
        Self::with_config(snapper, ZoneGeneratorConfig::default())
    }

    pub fn with_config(snapper: R, config: ZoneGeneratorConfig) -> Self {
        Self { snapper, config }
    }

    pub fn config(&self) -> &ZoneGeneratorConfig {
        &self.config
    }

    pub fn snapper(&self) -> &R {
        &self.snapper
    }

    /// Generates a batch around `player`, avoiding `existing` zones.
    ///
    /// Uses a freshly seeded RNG per call.
    pub async fn generate(
        &self,
        player: GeoPoint,
        existing: &[Zone],
        cancel: &CancellationToken,
    ) -> GenerationReport {
        let mut rng = StdRng::from_entropy();
        self.generate_with_rng(&mut rng, player, existing, cancel)
            .await
    }

    /// Generates a batch using the supplied RNG.
    pub async fn generate_with_rng<G: Rng + Send>(
        &self,
        rng: &mut G,
        player: GeoPoint,
        existing: &[Zone],
        cancel: &CancellationToken,
    ) -> GenerationReport {
        let cfg = &self.config;
        let batch_time = Utc::now();
        let mut report = GenerationReport::default();

        while report.zones.len() < cfg.zones_per_batch && report.attempts < cfg.max_attempts {
            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }
            report.attempts += 1;

            let candidate =
                geo::random_point_in_disc(rng, player.lat, player.lng, cfg.aura_radius_m);

            let snap = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    report.cancelled = true;
                    break;
                }
                result = tokio::time::timeout(cfg.snap_timeout, self.snapper.snap_to_road(candidate)) => result,
            };

            let center = match snap {
                Ok(Ok(Some(point))) => point,
                Ok(Ok(None)) => {
                    report.unsnapped += 1;
                    trace!(attempt = report.attempts, "Candidate not near a road");
                    continue;
                }
                Ok(Err(e)) => {
                    report.snap_failures += 1;
                    warn!(attempt = report.attempts, error = %e, "Road snap failed");
                    continue;
                }
                Err(_) => {
                    report.snap_failures += 1;
                    warn!(
                        attempt = report.attempts,
                        timeout_ms = cfg.snap_timeout.as_millis() as u64,
                        "Road snap timed out"
                    );
                    continue;
                }
            };

            if self.overlaps(&center, existing, &report.zones) {
                report.overlaps += 1;
                trace!(
                    attempt = report.attempts,
                    lat = center.lat,
                    lng = center.lng,
                    "Candidate overlaps an existing zone"
                );
                continue;
            }

            let hidden = geo::random_point_in_disc(
                rng,
                center.lat,
                center.lng,
                cfg.zone_radius_m * cfg.hidden_point_ratio,
            );
            let id = zone::zone_id(rng, batch_time, report.zones.len());

            trace!(attempt = report.attempts, zone_id = %id, "Zone accepted");
            report
                .zones
                .push(Zone::new(id, center, cfg.zone_radius_m, hidden));
        }

        info!(
            lat = player.lat,
            lng = player.lng,
            zones = report.zones.len(),
            attempts = report.attempts,
            snap_failures = report.snap_failures,
            unsnapped = report.unsnapped,
            overlaps = report.overlaps,
            cancelled = report.cancelled,
            "Zone generation finished"
        );

        report
    }

    /// Generates around `player` and persists the batch as a single write.
    ///
    /// Existing zones are read from the store first so the new batch keeps
    /// its distance from them. A cancelled batch is discarded.
    pub async fn populate<S: ZoneStore>(
        &self,
        store: &S,
        player: GeoPoint,
        cancel: &CancellationToken,
    ) -> Result<GenerationReport, StoreError> {
        let existing = store.all().await?;
        let report = self.generate(player, &existing, cancel).await;

        if !report.cancelled && !report.zones.is_empty() {
            store.insert_all(report.zones.clone()).await?;
        }

        Ok(report)
    }

    fn overlaps(&self, center: &GeoPoint, existing: &[Zone], accepted: &[Zone]) -> bool {
        existing
            .iter()
            .chain(accepted)
            .any(|z| z.distance_from_center(center) < self.config.min_separation_m)
    }
}
