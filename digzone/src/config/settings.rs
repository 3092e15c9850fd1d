//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Zone generation and collection settings
    pub game: GameSettings,
    /// Location feed settings
    pub location: LocationSettings,
    /// Road snapping service settings
    pub roads: RoadsSettings,
    /// Hint pricing
    pub hints: HintSettings,
    /// Zone persistence settings
    pub store: StoreSettings,
    /// Logging settings
    pub logging: LoggingSettings,
    /// Periodic zone purge settings
    pub purge: PurgeSettings,
}

/// Game tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSettings {
    /// Visible radius of each zone in meters
    pub zone_radius: f64,
    /// Minimum distance between zone centers in meters
    pub min_separation: f64,
    /// Radius around the player in which zones are shown and generated
    pub aura_radius: f64,
    /// Zones requested per generation batch
    pub zones_per_batch: usize,
    /// Candidate attempts before a batch gives up
    pub max_attempts: usize,
    /// Distance from a hidden point that counts as a dig
    pub collection_radius: f64,
}

/// Location feed configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationSettings {
    /// Requested interval between fixes in milliseconds
    pub update_interval_ms: u64,
    /// Fixes closer than this many meters to the last one are dropped
    pub min_movement: f64,
}

/// Road snapping configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadsSettings {
    /// Google Roads API key. Without one, points are used unsnapped.
    pub api_key: Option<String>,
    /// Base URL of the roads service
    pub base_url: String,
    /// HTTP timeout in seconds
    pub timeout_secs: u64,
}

/// Hint costs in steps.
#[derive(Debug, Clone, PartialEq)]
pub struct HintSettings {
    pub highlight_cost: u64,
    pub remote_collect_cost: u64,
    pub scan_cost: u64,
}

/// Zone store configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSettings {
    /// JSON file holding generated zones
    pub zones_file: PathBuf,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}

/// Purge daemon configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PurgeSettings {
    /// Hours between full zone purges
    pub interval_hours: u64,
}
