//! Synthetic walk for demos and tests.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::trace;

use super::{LocationSource, PlayerLocation, DEFAULT_CHANNEL_CAPACITY};
use crate::geo::{self, GeoPoint};

/// Default walking speed in meters per second.
pub const DEFAULT_WALK_SPEED_MPS: f64 = 1.4;

/// Emits fixes along a great-circle path at constant speed.
#[derive(Debug, Clone)]
pub struct WalkSimulator {
    start: GeoPoint,
    bearing_deg: f64,
    speed_mps: f64,
    steps: Option<usize>,
}

impl WalkSimulator {
    /// Creates an endless walk north at walking pace.
    pub fn new(start: GeoPoint) -> Self {
        Self {
            start,
            bearing_deg: 0.0,
            speed_mps: DEFAULT_WALK_SPEED_MPS,
            steps: None,
        }
    }

    pub fn with_bearing(mut self, bearing_deg: f64) -> Self {
        self.bearing_deg = bearing_deg;
        self
    }

    pub fn with_speed(mut self, speed_mps: f64) -> Self {
        self.speed_mps = speed_mps;
        self
    }

    /// Stops the stream after `steps` fixes.
    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = Some(steps);
        self
    }

    /// Position after walking for `elapsed`.
    pub fn position_at(&self, elapsed: Duration) -> GeoPoint {
        let distance = self.speed_mps * elapsed.as_secs_f64();
        geo::destination_point(self.start, self.bearing_deg, distance)
    }
}

impl LocationSource for WalkSimulator {
    async fn last_known(&self) -> Option<PlayerLocation> {
        Some(self.start.into())
    }

    fn updates(&self, interval: Duration) -> mpsc::Receiver<PlayerLocation> {
        let (tx, rx) = mpsc::channel(DEFAULT_CHANNEL_CAPACITY);
        let walk = self.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            let mut step: usize = 0;

            loop {
                if walk.steps.is_some_and(|max| step >= max) {
                    break;
                }
                ticker.tick().await;
                step += 1;

                let point = walk.position_at(interval * step as u32);
                trace!(step, lat = point.lat, lng = point.lng, "Simulated fix");

                if tx.send(point.into()).await.is_err() {
                    break;
                }
            }
        });

        rx
    }
}
