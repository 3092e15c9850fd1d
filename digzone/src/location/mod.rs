//! Player location input.
//!
//! The engine consumes positions through [`LocationSource`]: a one-shot
//! "last known" fix for a fast start, plus a continuous stream delivered on
//! an mpsc channel. Two sources ship with the crate:
//!
//! - [`ChannelLocationSource`] - the host pushes fixes through a [`LocationSender`]
//! - [`WalkSimulator`] - synthesizes a straight-line walk

mod channel;
mod simulator;

pub use channel::{ChannelLocationSource, LocationSender};
pub use simulator::{WalkSimulator, DEFAULT_WALK_SPEED_MPS};

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use crate::geo::{self, GeoPoint};

/// Default interval requested from location sources.
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_millis(5000);

/// Default minimum movement between accepted fixes in meters.
pub const DEFAULT_MIN_MOVEMENT_M: f64 = 10.0;

/// Default buffer size for location channels.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 32;

/// A single position fix. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerLocation {
    pub lat: f64,
    pub lng: f64,
    /// When the fix was taken
    pub timestamp: Instant,
}

impl PlayerLocation {
    /// Creates a fix stamped with the current instant.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self::at(lat, lng, Instant::now())
    }

    pub fn at(lat: f64, lng: f64, timestamp: Instant) -> Self {
        Self { lat, lng, timestamp }
    }

    #[inline]
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }
}

impl From<GeoPoint> for PlayerLocation {
    fn from(point: GeoPoint) -> Self {
        Self::new(point.lat, point.lng)
    }
}

/// Source of player positions.
pub trait LocationSource: Send + Sync + 'static {
    /// Most recent cached fix, if the platform has one.
    fn last_known(&self) -> impl Future<Output = Option<PlayerLocation>> + Send;

    /// Starts the continuous stream.
    ///
    /// `interval` is the desired spacing between fixes. Push-based sources
    /// may ignore it. The stream ends when the receiver is dropped or the
    /// source has nothing more to deliver.
    fn updates(&self, interval: Duration) -> mpsc::Receiver<PlayerLocation>;
}

impl<T: LocationSource> LocationSource for Arc<T> {
    fn last_known(&self) -> impl Future<Output = Option<PlayerLocation>> + Send {
        (**self).last_known()
    }

    fn updates(&self, interval: Duration) -> mpsc::Receiver<PlayerLocation> {
        (**self).updates(interval)
    }
}

/// Drops fixes that moved less than a threshold from the last accepted one.
#[derive(Debug, Clone)]
pub struct JitterFilter {
    min_movement_m: f64,
    last: Option<GeoPoint>,
}

impl Default for JitterFilter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_MOVEMENT_M)
    }
}

impl JitterFilter {
    pub fn new(min_movement_m: f64) -> Self {
        Self {
            min_movement_m,
            last: None,
        }
    }

    /// Returns true and remembers the fix if it moved far enough.
    ///
    /// The first fix is always accepted.
    pub fn accept(&mut self, location: &PlayerLocation) -> bool {
        let point = location.point();
        if let Some(last) = self.last {
            let moved = geo::distance_meters(last.lat, last.lng, point.lat, point.lng);
            if moved < self.min_movement_m {
                return false;
            }
        }
        self.last = Some(point);
        true
    }

    pub fn last_accepted(&self) -> Option<GeoPoint> {
        self.last
    }
}
