//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let api_key = config.roads.api_key.as_deref().unwrap_or("");

    format!(
        r#"[game]
; Visible radius of each zone in meters (default: 100)
zone_radius = {}
; Minimum distance between two zone centers in meters (default: 210)
min_separation = {}
; Zones within this many meters of the player are shown, and new zones
; are generated inside it when none are visible (default: 1000)
aura_radius = {}
; Zones requested per generation batch (default: 10)
zones_per_batch = {}
; Candidate points tried before a batch gives up (default: 500)
max_attempts = {}
; Walking within this many meters of a hidden point digs it up (default: 25)
collection_radius = {}

[location]
; Interval requested from the location source in milliseconds (default: 5000)
update_interval_ms = {}
; Fixes closer than this many meters to the last accepted one are ignored (default: 10)
min_movement = {}

[roads]
; Google Roads API key. Leave empty to place zones without road snapping.
; Get one at: https://console.cloud.google.com (enable Roads API)
api_key = {}
; Base URL of the roads service
base_url = {}
; HTTP timeout in seconds (default: 10)
timeout_secs = {}

[hints]
; Hint prices in steps
highlight_cost = {}
remote_collect_cost = {}
scan_cost = {}

[store]
; JSON file holding generated zones
zones_file = {}

[logging]
; Log file location
file = {}

[purge]
; Hours between full zone purges (default: 24)
interval_hours = {}
"#,
        config.game.zone_radius,
        config.game.min_separation,
        config.game.aura_radius,
        config.game.zones_per_batch,
        config.game.max_attempts,
        config.game.collection_radius,
        config.location.update_interval_ms,
        config.location.min_movement,
        api_key,
        config.roads.base_url,
        config.roads.timeout_secs,
        config.hints.highlight_cost,
        config.hints.remote_collect_cost,
        config.hints.scan_cost,
        path_to_string(&config.store.zones_file),
        path_to_string(&config.logging.file),
        config.purge.interval_hours,
    )
}

/// Convert path to string, using ~ for home directory.
pub(super) fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
