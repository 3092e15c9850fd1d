//! Default values and constants for all configuration settings.
//!
//! Numeric game defaults are shared with the engine modules so that an
//! empty config file behaves exactly like the library defaults.

use std::path::PathBuf;

use super::file::config_directory;
use super::settings::*;
use crate::generator::{
    DEFAULT_AURA_RADIUS_M, DEFAULT_MAX_ATTEMPTS, DEFAULT_MIN_SEPARATION_M,
    DEFAULT_ZONES_PER_BATCH,
};
use crate::jobs::DEFAULT_PURGE_INTERVAL_SECS;
use crate::location::{DEFAULT_MIN_MOVEMENT_M, DEFAULT_UPDATE_INTERVAL};
use crate::road::{DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_ROADS_BASE_URL};
use crate::session::{
    DEFAULT_HIGHLIGHT_COST, DEFAULT_REMOTE_COLLECT_COST, DEFAULT_SATELLITE_SCAN_COST,
};
use crate::zone::{DEFAULT_COLLECTION_RADIUS_M, DEFAULT_ZONE_RADIUS_M};

/// Default zones file name inside the config directory.
pub const DEFAULT_ZONES_FILE_NAME: &str = "zones.json";

/// Default log file name inside the config directory.
pub const DEFAULT_LOG_FILE_NAME: &str = "digzone.log";

/// Default purge interval (24 hours).
pub const DEFAULT_PURGE_INTERVAL_HOURS: u64 = DEFAULT_PURGE_INTERVAL_SECS / 3600;

/// Default location of the zones file (~/.digzone/zones.json).
pub fn default_zones_file() -> PathBuf {
    config_directory().join(DEFAULT_ZONES_FILE_NAME)
}

/// Default location of the log file (~/.digzone/digzone.log).
pub fn default_log_file() -> PathBuf {
    config_directory().join(DEFAULT_LOG_FILE_NAME)
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            game: GameSettings::default(),
            location: LocationSettings::default(),
            roads: RoadsSettings::default(),
            hints: HintSettings::default(),
            store: StoreSettings::default(),
            logging: LoggingSettings::default(),
            purge: PurgeSettings::default(),
        }
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            zone_radius: DEFAULT_ZONE_RADIUS_M,
            min_separation: DEFAULT_MIN_SEPARATION_M,
            aura_radius: DEFAULT_AURA_RADIUS_M,
            zones_per_batch: DEFAULT_ZONES_PER_BATCH,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            collection_radius: DEFAULT_COLLECTION_RADIUS_M,
        }
    }
}

impl Default for LocationSettings {
    fn default() -> Self {
        Self {
            update_interval_ms: DEFAULT_UPDATE_INTERVAL.as_millis() as u64,
            min_movement: DEFAULT_MIN_MOVEMENT_M,
        }
    }
}

impl Default for RoadsSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_ROADS_BASE_URL.to_string(),
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

impl Default for HintSettings {
    fn default() -> Self {
        Self {
            highlight_cost: DEFAULT_HIGHLIGHT_COST,
            remote_collect_cost: DEFAULT_REMOTE_COLLECT_COST,
            scan_cost: DEFAULT_SATELLITE_SCAN_COST,
        }
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            zones_file: default_zones_file(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: default_log_file(),
        }
    }
}

impl Default for PurgeSettings {
    fn default() -> Self {
        Self {
            interval_hours: DEFAULT_PURGE_INTERVAL_HOURS,
        }
    }
}
