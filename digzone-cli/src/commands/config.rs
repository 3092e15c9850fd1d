//! Configuration management CLI commands.
//!
//! Provides `config get`, `config set`, `config list` and `config path`
//! for viewing and modifying configuration settings from the command line.

use clap::Subcommand;
use digzone::config::{config_file_path, ConfigFile, ConfigKey};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Configuration key in format section.key (e.g., game.aura_radius)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key in format section.key (e.g., game.aura_radius)
        key: String,

        /// Value to set
        value: String,
    },

    /// List all configuration settings
    List,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Get { key } => run_get(&key),
        ConfigCommands::Set { key, value } => run_set(&key, &value),
        ConfigCommands::List => run_list(),
        ConfigCommands::Path => run_path(),
    }
}

fn parse_key(key: &str) -> Result<ConfigKey, CliError> {
    key.parse().map_err(|_| {
        CliError::Config(format!(
            "Unknown configuration key '{}'. Use 'digzone config list' to see available keys.",
            key
        ))
    })
}

/// Value as shown by `list`; the API key is never echoed.
fn display_value(key: ConfigKey, config: &ConfigFile) -> String {
    let value = key.get(config);
    if value.is_empty() {
        "(not set)".to_string()
    } else if key == ConfigKey::RoadsApiKey {
        "(set)".to_string()
    } else {
        value
    }
}

fn run_get(key: &str) -> Result<(), CliError> {
    let config_key = parse_key(key)?;
    let config = ConfigFile::load()?;
    let value = config_key.get(&config);

    if value.is_empty() {
        println!("(not set)");
    } else {
        println!("{}", value);
    }

    Ok(())
}

/// Set a value and save. A config file that fails to parse is left untouched.
fn run_set(key: &str, value: &str) -> Result<(), CliError> {
    let config_key = parse_key(key)?;

    let mut config = ConfigFile::load()?;
    config_key
        .set(&mut config, value)
        .map_err(|e| CliError::Config(e.to_string()))?;
    config.save()?;

    println!("Set {} = {}", config_key.name(), config_key.get(&config));

    Ok(())
}

fn run_list() -> Result<(), CliError> {
    let config = ConfigFile::load()?;

    println!("Configuration Settings");
    println!("======================");
    println!();

    let mut current_section = "";

    for key in ConfigKey::all() {
        let section = key.section();

        if section != current_section {
            if !current_section.is_empty() {
                println!();
            }
            println!("[{}]", section);
            current_section = section;
        }

        println!("  {} = {}", key.key_name(), display_value(*key, &config));
    }

    Ok(())
}

fn run_path() -> Result<(), CliError> {
    println!("{}", config_file_path().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_key_is_config_error() {
        assert!(matches!(parse_key("nope.nothing"), Err(CliError::Config(_))));
        assert_eq!(parse_key("purge.interval_hours").unwrap(), ConfigKey::PurgeIntervalHours);
    }

    #[test]
    fn test_api_key_is_masked() {
        let mut config = ConfigFile::default();
        assert_eq!(display_value(ConfigKey::RoadsApiKey, &config), "(not set)");

        config.roads.api_key = Some("secret".to_string());
        assert_eq!(display_value(ConfigKey::RoadsApiKey, &config), "(set)");
        assert_eq!(display_value(ConfigKey::GameZoneRadius, &config), "100");
    }
}
