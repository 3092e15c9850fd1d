//! Configuration file handling for ~/.digzone/config.ini.
//!
//! Loads and saves user configuration with sensible defaults.
//! Settings structs live in [`super::settings`], constants in [`super::defaults`],
//! parsing in [`super::parser`], and serialization in [`super::writer`].

use ini::Ini;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub use super::defaults::*;
pub use super::settings::*;

use crate::generator::ZoneGeneratorConfig;
use crate::session::{HintCosts, SessionConfig};

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

impl ConfigFile {
    /// Load configuration from the default path (~/.digzone/config.ini).
    pub fn load() -> Result<Self, ConfigFileError> {
        let path = config_file_path();
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Save configuration to the default path (~/.digzone/config.ini).
    pub fn save(&self) -> Result<(), ConfigFileError> {
        let path = config_file_path();
        self.save_to(&path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        let content = super::writer::to_config_string(self);
        std::fs::write(path, content).map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }

    /// Create the default config file if it doesn't exist.
    ///
    /// Returns the path to the config file.
    pub fn ensure_exists() -> Result<PathBuf, ConfigFileError> {
        let path = config_file_path();
        if !path.exists() {
            Self::default().save_to(&path)?;
        }
        Ok(path)
    }

    /// Generator tuning taken from `[game]`.
    pub fn generator_config(&self) -> ZoneGeneratorConfig {
        ZoneGeneratorConfig {
            zone_radius_m: self.game.zone_radius,
            min_separation_m: self.game.min_separation,
            aura_radius_m: self.game.aura_radius,
            zones_per_batch: self.game.zones_per_batch,
            max_attempts: self.game.max_attempts,
            ..ZoneGeneratorConfig::default()
        }
    }

    /// Session tuning taken from `[game]`, `[location]` and `[hints]`.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            collection_radius_m: self.game.collection_radius,
            min_movement_m: self.location.min_movement,
            update_interval: Duration::from_millis(self.location.update_interval_ms),
            hint_costs: HintCosts {
                highlight: self.hints.highlight_cost,
                remote_collect: self.hints.remote_collect_cost,
                satellite_scan: self.hints.scan_cost,
            },
            ..SessionConfig::default()
        }
    }

    /// Interval between zone purges.
    pub fn purge_interval(&self) -> Duration {
        Duration::from_secs(self.purge.interval_hours * 3600)
    }
}

/// Get the path to the config directory (~/.digzone).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".digzone")
}

/// Get the path to the config file (~/.digzone/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default();

        assert_eq!(config.game.zone_radius, 100.0);
        assert_eq!(config.game.min_separation, 210.0);
        assert_eq!(config.game.aura_radius, 1000.0);
        assert_eq!(config.game.zones_per_batch, 10);
        assert_eq!(config.game.collection_radius, 25.0);
        assert_eq!(config.location.update_interval_ms, 5000);
        assert!(config.roads.api_key.is_none());
        assert_eq!(config.purge.interval_hours, 24);
        assert!(config.store.zones_file.ends_with("zones.json"));
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ConfigFile::load_from(&dir.path().join("absent.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.ini");

        let mut config = ConfigFile::default();
        config.game.aura_radius = 750.0;
        config.location.min_movement = 3.5;
        config.roads.api_key = Some("key".to_string());
        config.store.zones_file = dir.path().join("zones.json");
        config.save_to(&path).unwrap();

        let loaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_value_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[game]\nzones_per_batch = lots\n").unwrap();

        let err = ConfigFile::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigFileError::InvalidValue { .. }));
    }

    #[test]
    fn test_engine_configs_follow_settings() {
        let mut config = ConfigFile::default();
        config.game.zones_per_batch = 3;
        config.game.collection_radius = 12.0;
        config.location.update_interval_ms = 250;
        config.hints.remote_collect_cost = 7;

        let generator = config.generator_config();
        assert_eq!(generator.zones_per_batch, 3);
        assert_eq!(generator.zone_radius_m, 100.0);

        let session = config.session_config();
        assert_eq!(session.collection_radius_m, 12.0);
        assert_eq!(session.update_interval, Duration::from_millis(250));
        assert_eq!(session.hint_costs.remote_collect, 7);

        assert_eq!(config.purge_interval(), Duration::from_secs(24 * 3600));
    }
}
