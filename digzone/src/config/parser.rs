//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use std::path::PathBuf;
use std::str::FromStr;

use ini::{Ini, Properties};

use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [game] section
    if let Some(section) = ini.section(Some("game")) {
        if let Some(v) = positive_f64(section, "game", "zone_radius")? {
            config.game.zone_radius = v;
        }
        if let Some(v) = non_negative_f64(section, "game", "min_separation")? {
            config.game.min_separation = v;
        }
        if let Some(v) = positive_f64(section, "game", "aura_radius")? {
            config.game.aura_radius = v;
        }
        if let Some(v) = positive_int(section, "game", "zones_per_batch")? {
            config.game.zones_per_batch = v;
        }
        if let Some(v) = positive_int(section, "game", "max_attempts")? {
            config.game.max_attempts = v;
        }
        if let Some(v) = positive_f64(section, "game", "collection_radius")? {
            config.game.collection_radius = v;
        }
    }

    // [location] section
    if let Some(section) = ini.section(Some("location")) {
        if let Some(v) = positive_int(section, "location", "update_interval_ms")? {
            config.location.update_interval_ms = v;
        }
        if let Some(v) = non_negative_f64(section, "location", "min_movement")? {
            config.location.min_movement = v;
        }
    }

    // [roads] section
    if let Some(section) = ini.section(Some("roads")) {
        if let Some(v) = section.get("api_key") {
            let v = v.trim();
            if !v.is_empty() {
                config.roads.api_key = Some(v.to_string());
            }
        }
        if let Some(v) = section.get("base_url") {
            let v = v.trim();
            if !v.is_empty() {
                if !(v.starts_with("http://") || v.starts_with("https://")) {
                    return Err(invalid(
                        "roads",
                        "base_url",
                        v,
                        "must start with 'http://' or 'https://'",
                    ));
                }
                config.roads.base_url = v.to_string();
            }
        }
        if let Some(v) = positive_int(section, "roads", "timeout_secs")? {
            config.roads.timeout_secs = v;
        }
    }

    // [hints] section
    if let Some(section) = ini.section(Some("hints")) {
        if let Some(v) = integer(section, "hints", "highlight_cost")? {
            config.hints.highlight_cost = v;
        }
        if let Some(v) = integer(section, "hints", "remote_collect_cost")? {
            config.hints.remote_collect_cost = v;
        }
        if let Some(v) = integer(section, "hints", "scan_cost")? {
            config.hints.scan_cost = v;
        }
    }

    // [store] section
    if let Some(section) = ini.section(Some("store")) {
        if let Some(v) = section.get("zones_file") {
            let v = v.trim();
            if !v.is_empty() {
                config.store.zones_file = expand_tilde(v);
            }
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    // [purge] section
    if let Some(section) = ini.section(Some("purge")) {
        if let Some(v) = positive_int(section, "purge", "interval_hours")? {
            config.purge.interval_hours = v;
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Parse an unsigned integer, rejecting zero.
fn positive_int<T>(
    props: &Properties,
    section: &str,
    key: &str,
) -> Result<Option<T>, ConfigFileError>
where
    T: FromStr + PartialEq + Default,
{
    match integer::<T>(props, section, key)? {
        Some(v) if v == T::default() => Err(invalid(
            section,
            key,
            props.get(key).unwrap_or_default(),
            "must be greater than zero",
        )),
        other => Ok(other),
    }
}

fn integer<T: FromStr>(
    props: &Properties,
    section: &str,
    key: &str,
) -> Result<Option<T>, ConfigFileError> {
    let Some(raw) = props.get(key) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|_| invalid(section, key, raw, "must be a non-negative integer"))
}

fn positive_f64(
    props: &Properties,
    section: &str,
    key: &str,
) -> Result<Option<f64>, ConfigFileError> {
    match non_negative_f64(props, section, key)? {
        Some(v) if v == 0.0 => Err(invalid(
            section,
            key,
            props.get(key).unwrap_or_default(),
            "must be greater than zero",
        )),
        other => Ok(other),
    }
}

fn non_negative_f64(
    props: &Properties,
    section: &str,
    key: &str,
) -> Result<Option<f64>, ConfigFileError> {
    let Some(raw) = props.get(key) else {
        return Ok(None);
    };
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(Some(v)),
        _ => Err(invalid(section, key, raw, "must be a non-negative number")),
    }
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
