//! Configuration key access and validation.
//!
//! This module provides a type-safe interface for getting and setting
//! configuration values by key name, with validation via the Specification Pattern.

use std::str::FromStr;
use thiserror::Error;

use super::file::ConfigFile;
use super::parser::expand_tilde;
use super::writer::path_to_string;

/// Errors that can occur when getting or setting configuration values.
#[derive(Debug, Error)]
pub enum ConfigKeyError {
    /// Unknown configuration key.
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    /// Validation failed for the value.
    #[error("Invalid value for {key}: {reason}")]
    ValidationFailed { key: String, reason: String },
}

/// Supported configuration keys.
///
/// Each key maps to a specific field in [`ConfigFile`] and knows how to
/// get and set its value with proper validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    // Game settings
    GameZoneRadius,
    GameMinSeparation,
    GameAuraRadius,
    GameZonesPerBatch,
    GameMaxAttempts,
    GameCollectionRadius,

    // Location settings
    LocationUpdateIntervalMs,
    LocationMinMovement,

    // Roads settings
    RoadsApiKey,
    RoadsBaseUrl,
    RoadsTimeoutSecs,

    // Hint settings
    HintsHighlightCost,
    HintsRemoteCollectCost,
    HintsScanCost,

    StoreZonesFile,
    LoggingFile,
    PurgeIntervalHours,
}

impl FromStr for ConfigKey {
    type Err = ConfigKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|key| key.name() == lower)
            .ok_or_else(|| ConfigKeyError::UnknownKey(s.to_string()))
    }
}

impl ConfigKey {
    /// Get the canonical key name (e.g., "game.zone_radius").
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::GameZoneRadius => "game.zone_radius",
            ConfigKey::GameMinSeparation => "game.min_separation",
            ConfigKey::GameAuraRadius => "game.aura_radius",
            ConfigKey::GameZonesPerBatch => "game.zones_per_batch",
            ConfigKey::GameMaxAttempts => "game.max_attempts",
            ConfigKey::GameCollectionRadius => "game.collection_radius",
            ConfigKey::LocationUpdateIntervalMs => "location.update_interval_ms",
            ConfigKey::LocationMinMovement => "location.min_movement",
            ConfigKey::RoadsApiKey => "roads.api_key",
            ConfigKey::RoadsBaseUrl => "roads.base_url",
            ConfigKey::RoadsTimeoutSecs => "roads.timeout_secs",
            ConfigKey::HintsHighlightCost => "hints.highlight_cost",
            ConfigKey::HintsRemoteCollectCost => "hints.remote_collect_cost",
            ConfigKey::HintsScanCost => "hints.scan_cost",
            ConfigKey::StoreZonesFile => "store.zones_file",
            ConfigKey::LoggingFile => "logging.file",
            ConfigKey::PurgeIntervalHours => "purge.interval_hours",
        }
    }

    /// Get the section name (e.g., "game").
    pub fn section(&self) -> &'static str {
        self.name().split('.').next().unwrap_or("")
    }

    /// Get the key name within the section (e.g., "zone_radius").
    pub fn key_name(&self) -> &'static str {
        self.name().split('.').nth(1).unwrap_or(self.name())
    }

    /// Get the value from a config file as a string.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::GameZoneRadius => config.game.zone_radius.to_string(),
            ConfigKey::GameMinSeparation => config.game.min_separation.to_string(),
            ConfigKey::GameAuraRadius => config.game.aura_radius.to_string(),
            ConfigKey::GameZonesPerBatch => config.game.zones_per_batch.to_string(),
            ConfigKey::GameMaxAttempts => config.game.max_attempts.to_string(),
            ConfigKey::GameCollectionRadius => config.game.collection_radius.to_string(),
            ConfigKey::LocationUpdateIntervalMs => config.location.update_interval_ms.to_string(),
            ConfigKey::LocationMinMovement => config.location.min_movement.to_string(),
            ConfigKey::RoadsApiKey => config.roads.api_key.clone().unwrap_or_default(),
            ConfigKey::RoadsBaseUrl => config.roads.base_url.clone(),
            ConfigKey::RoadsTimeoutSecs => config.roads.timeout_secs.to_string(),
            ConfigKey::HintsHighlightCost => config.hints.highlight_cost.to_string(),
            ConfigKey::HintsRemoteCollectCost => config.hints.remote_collect_cost.to_string(),
            ConfigKey::HintsScanCost => config.hints.scan_cost.to_string(),
            ConfigKey::StoreZonesFile => path_to_string(&config.store.zones_file),
            ConfigKey::LoggingFile => path_to_string(&config.logging.file),
            ConfigKey::PurgeIntervalHours => config.purge.interval_hours.to_string(),
        }
    }

    /// Set the value in a config file.
    ///
    /// Validates the value according to the key's specification before setting.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigKeyError> {
        self.validate(value)?;
        let value = value.trim();
        match self {
            ConfigKey::GameZoneRadius => config.game.zone_radius = self.parse(value)?,
            ConfigKey::GameMinSeparation => config.game.min_separation = self.parse(value)?,
            ConfigKey::GameAuraRadius => config.game.aura_radius = self.parse(value)?,
            ConfigKey::GameZonesPerBatch => config.game.zones_per_batch = self.parse(value)?,
            ConfigKey::GameMaxAttempts => config.game.max_attempts = self.parse(value)?,
            ConfigKey::GameCollectionRadius => {
                config.game.collection_radius = self.parse(value)?
            }
            ConfigKey::LocationUpdateIntervalMs => {
                config.location.update_interval_ms = self.parse(value)?
            }
            ConfigKey::LocationMinMovement => config.location.min_movement = self.parse(value)?,
            ConfigKey::RoadsApiKey => {
                config.roads.api_key = (!value.is_empty()).then(|| value.to_string())
            }
            ConfigKey::RoadsBaseUrl => config.roads.base_url = value.to_string(),
            ConfigKey::RoadsTimeoutSecs => config.roads.timeout_secs = self.parse(value)?,
            ConfigKey::HintsHighlightCost => config.hints.highlight_cost = self.parse(value)?,
            ConfigKey::HintsRemoteCollectCost => {
                config.hints.remote_collect_cost = self.parse(value)?
            }
            ConfigKey::HintsScanCost => config.hints.scan_cost = self.parse(value)?,
            ConfigKey::StoreZonesFile => config.store.zones_file = expand_tilde(value),
            ConfigKey::LoggingFile => config.logging.file = expand_tilde(value),
            ConfigKey::PurgeIntervalHours => config.purge.interval_hours = self.parse(value)?,
        }
        Ok(())
    }

    fn parse<T: FromStr>(&self, value: &str) -> Result<T, ConfigKeyError> {
        value.parse().map_err(|_| ConfigKeyError::ValidationFailed {
            key: self.name().to_string(),
            reason: format!("cannot parse '{value}'"),
        })
    }

    /// Validate a value according to this key's specification.
    pub fn validate(&self, value: &str) -> Result<(), ConfigKeyError> {
        self.specification()
            .is_satisfied_by(value.trim())
            .map_err(|reason| ConfigKeyError::ValidationFailed {
                key: self.name().to_string(),
                reason,
            })
    }

    /// Get the validation specification for this key.
    fn specification(&self) -> Box<dyn ValueSpecification> {
        match self {
            ConfigKey::GameZoneRadius
            | ConfigKey::GameAuraRadius
            | ConfigKey::GameCollectionRadius => Box::new(PositiveNumberSpec),
            ConfigKey::GameMinSeparation | ConfigKey::LocationMinMovement => {
                Box::new(NonNegativeNumberSpec)
            }
            ConfigKey::GameZonesPerBatch
            | ConfigKey::GameMaxAttempts
            | ConfigKey::LocationUpdateIntervalMs
            | ConfigKey::RoadsTimeoutSecs
            | ConfigKey::PurgeIntervalHours => Box::new(PositiveIntegerSpec),
            ConfigKey::HintsHighlightCost
            | ConfigKey::HintsRemoteCollectCost
            | ConfigKey::HintsScanCost => Box::new(IntegerSpec),
            ConfigKey::RoadsApiKey => Box::new(AnyStringSpec),
            ConfigKey::RoadsBaseUrl => Box::new(UrlSpec),
            ConfigKey::StoreZonesFile | ConfigKey::LoggingFile => Box::new(PathSpec),
        }
    }

    /// Get all supported configuration keys.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::GameZoneRadius,
            ConfigKey::GameMinSeparation,
            ConfigKey::GameAuraRadius,
            ConfigKey::GameZonesPerBatch,
            ConfigKey::GameMaxAttempts,
            ConfigKey::GameCollectionRadius,
            ConfigKey::LocationUpdateIntervalMs,
            ConfigKey::LocationMinMovement,
            ConfigKey::RoadsApiKey,
            ConfigKey::RoadsBaseUrl,
            ConfigKey::RoadsTimeoutSecs,
            ConfigKey::HintsHighlightCost,
            ConfigKey::HintsRemoteCollectCost,
            ConfigKey::HintsScanCost,
            ConfigKey::StoreZonesFile,
            ConfigKey::LoggingFile,
            ConfigKey::PurgeIntervalHours,
        ]
    }
}

// ============================================================================
// Value Specifications (Specification Pattern)
// ============================================================================

/// Trait for value validation specifications.
trait ValueSpecification {
    /// Returns Ok(()) if valid, Err(reason) if invalid.
    fn is_satisfied_by(&self, value: &str) -> Result<(), String>;
}

struct AnyStringSpec;

impl ValueSpecification for AnyStringSpec {
    fn is_satisfied_by(&self, _value: &str) -> Result<(), String> {
        Ok(())
    }
}

/// Unsigned integer, zero allowed.
struct IntegerSpec;

impl ValueSpecification for IntegerSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        value
            .parse::<u64>()
            .map(|_| ())
            .map_err(|_| "must be a non-negative integer".to_string())
    }
}

/// Unsigned integer greater than zero.
struct PositiveIntegerSpec;

impl ValueSpecification for PositiveIntegerSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        match value.parse::<u64>() {
            Ok(n) if n > 0 => Ok(()),
            _ => Err("must be a positive integer".to_string()),
        }
    }
}

struct PositiveNumberSpec;

impl ValueSpecification for PositiveNumberSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        match value.parse::<f64>() {
            Ok(n) if n.is_finite() && n > 0.0 => Ok(()),
            _ => Err("must be a positive number".to_string()),
        }
    }
}

struct NonNegativeNumberSpec;

impl ValueSpecification for NonNegativeNumberSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        match value.parse::<f64>() {
            Ok(n) if n.is_finite() && n >= 0.0 => Ok(()),
            _ => Err("must be zero or a positive number".to_string()),
        }
    }
}

/// Specification for path values (non-empty).
struct PathSpec;

impl ValueSpecification for PathSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        if value.is_empty() {
            Err("must be a valid path".to_string())
        } else {
            Ok(())
        }
    }
}

struct UrlSpec;

impl ValueSpecification for UrlSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        if value.starts_with("http://") || value.starts_with("https://") {
            Ok(())
        } else {
            Err("must be a URL starting with 'http://' or 'https://'".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_key_parsing() {
        assert_eq!(
            "game.zone_radius".parse::<ConfigKey>().unwrap(),
            ConfigKey::GameZoneRadius
        );
        assert_eq!(
            "ROADS.API_KEY".parse::<ConfigKey>().unwrap(),
            ConfigKey::RoadsApiKey
        );
        assert!(matches!(
            "game.nonsense".parse::<ConfigKey>(),
            Err(ConfigKeyError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_key_name_parts() {
        let key = ConfigKey::HintsRemoteCollectCost;
        assert_eq!(key.section(), "hints");
        assert_eq!(key.key_name(), "remote_collect_cost");
    }

    #[test]
    fn test_get_value() {
        let config = ConfigFile::default();
        assert_eq!(ConfigKey::GameZoneRadius.get(&config), "100");
        assert_eq!(ConfigKey::RoadsApiKey.get(&config), "");
        assert_eq!(ConfigKey::PurgeIntervalHours.get(&config), "24");
    }

    #[test]
    fn test_set_value() {
        let mut config = ConfigFile::default();

        ConfigKey::GameAuraRadius.set(&mut config, "1500").unwrap();
        ConfigKey::RoadsApiKey.set(&mut config, "abc").unwrap();
        ConfigKey::HintsScanCost.set(&mut config, "0").unwrap();

        assert_eq!(config.game.aura_radius, 1500.0);
        assert_eq!(config.roads.api_key.as_deref(), Some("abc"));
        assert_eq!(config.hints.scan_cost, 0);
    }

    #[test]
    fn test_clear_api_key() {
        let mut config = ConfigFile::default();
        ConfigKey::RoadsApiKey.set(&mut config, "abc").unwrap();
        ConfigKey::RoadsApiKey.set(&mut config, "").unwrap();
        assert!(config.roads.api_key.is_none());
    }

    #[test]
    fn test_set_invalid_value_fails() {
        let mut config = ConfigFile::default();

        assert!(ConfigKey::GameZoneRadius.set(&mut config, "0").is_err());
        assert!(ConfigKey::GameZonesPerBatch.set(&mut config, "-2").is_err());
        assert!(ConfigKey::RoadsBaseUrl.set(&mut config, "roads.local").is_err());
        assert!(ConfigKey::StoreZonesFile.set(&mut config, "  ").is_err());

        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_min_movement_allows_zero() {
        assert!(ConfigKey::LocationMinMovement.validate("0").is_ok());
        assert!(ConfigKey::LocationMinMovement.validate("-0.5").is_err());
    }

    #[test]
    fn test_all_keys_round_trip_by_name() {
        for key in ConfigKey::all() {
            assert_eq!(key.name().parse::<ConfigKey>().unwrap(), *key);
        }
        assert_eq!(ConfigKey::all().len(), 17);
    }
}
