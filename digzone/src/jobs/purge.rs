//! Daily zone purge daemon.
//!
//! Zones are meant to be short-lived: once a day the whole store is wiped
//! and players get a fresh batch the next time they look around. The daemon
//! runs in a background task and:
//! 1. Waits one interval (default: 24 hours)
//! 2. Deletes every zone
//! 3. On failure, retries after a short delay (default: 5 minutes)
//! 4. Respects cancellation for graceful shutdown
//!
//! # Example
//!
//! ```ignore
//! use digzone::jobs::ZonePurgeDaemon;
//!
//! let daemon = ZonePurgeDaemon::new(store);
//! tokio::spawn(daemon.run(shutdown_token));
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::store::{StoreError, ZoneStore};

/// Default interval between purges (24 hours).
pub const DEFAULT_PURGE_INTERVAL_SECS: u64 = 24 * 60 * 60;

/// Default delay before retrying a failed purge (5 minutes).
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 5 * 60;

/// Background daemon that periodically deletes all zones.
pub struct ZonePurgeDaemon<S: ZoneStore> {
    /// Store to purge.
    store: Arc<S>,

    /// Interval between successful purges.
    interval: Duration,

    /// Delay before retrying after a failure.
    retry_delay: Duration,
}

impl<S: ZoneStore> ZonePurgeDaemon<S> {
    /// Creates a new purge daemon with default settings.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            interval: Duration::from_secs(DEFAULT_PURGE_INTERVAL_SECS),
            retry_delay: Duration::from_secs(DEFAULT_RETRY_DELAY_SECS),
        }
    }

    /// Sets a custom purge interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Sets a custom retry delay.
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Deletes every zone immediately and returns how many were removed.
    pub async fn purge_now(&self) -> Result<usize, StoreError> {
        let removed = self.store.delete_all().await?;
        info!(removed, "Zone purge complete");
        Ok(removed)
    }

    /// Runs the daemon until shutdown is signalled.
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            interval_secs = self.interval.as_secs(),
            retry_delay_secs = self.retry_delay.as_secs(),
            "Zone purge daemon starting"
        );

        let mut delay = self.interval;

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    info!("Zone purge daemon shutting down");
                    break;
                }

                _ = tokio::time::sleep(delay) => {
                    delay = match self.purge_now().await {
                        Ok(_) => self.interval,
                        Err(e) => {
                            warn!(
                                error = %e,
                                retry_in_secs = self.retry_delay.as_secs(),
                                "Zone purge failed, will retry"
                            );
                            self.retry_delay
                        }
                    };
                }
            }
        }
    }
}
