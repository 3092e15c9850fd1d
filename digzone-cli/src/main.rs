//! DigZone CLI - Command-line interface
//!
//! This binary drives the DigZone engine from a terminal: simulated walks,
//! zone inspection, store maintenance and configuration.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::simulate::{HintArg, SimulateArgs};
use commands::zones::ZonesArgs;
use digzone::location::DEFAULT_WALK_SPEED_MPS;

#[derive(Parser)]
#[command(name = "digzone")]
#[command(version = digzone::VERSION)]
#[command(about = "Walk around, find zones, dig up bones", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk a simulated player through a session
    Simulate {
        /// Start latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Start longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,

        /// Walking direction in degrees clockwise from north
        #[arg(long, default_value_t = 0.0)]
        bearing: f64,

        /// Walking speed in meters per second
        #[arg(long, default_value_t = DEFAULT_WALK_SPEED_MPS)]
        speed: f64,

        /// Number of location fixes to emit
        #[arg(long, default_value_t = 20)]
        steps: usize,

        /// Milliseconds between fixes (default: location.update_interval_ms)
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Starting step balance for hint purchases
        #[arg(long, default_value_t = 0)]
        balance: u64,

        /// Place zones without calling the roads service
        #[arg(long)]
        offline: bool,

        /// Hints to buy once the first zones are visible (repeatable)
        #[arg(long = "hint", value_enum)]
        hints: Vec<HintArg>,
    },

    /// List zones visible from a position
    Zones {
        /// Latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
    },

    /// Delete every stored zone
    Purge,

    /// View or change configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Simulate {
            lat,
            lng,
            bearing,
            speed,
            steps,
            interval_ms,
            balance,
            offline,
            hints,
        } => commands::simulate::run(SimulateArgs {
            lat,
            lng,
            bearing,
            speed,
            steps,
            interval_ms,
            balance,
            offline,
            hints,
        }),
        Commands::Zones { lat, lng } => commands::zones::run(ZonesArgs { lat, lng }),
        Commands::Purge => commands::purge::run(),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        e.exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_simulate_with_hints() {
        let cli = Cli::try_parse_from([
            "digzone", "simulate", "--lat", "-33.86", "--lng", "151.2", "--hint", "highlight",
            "--hint", "satellite-scan", "--offline",
        ])
        .unwrap();

        match cli.command {
            Commands::Simulate {
                lat,
                hints,
                offline,
                steps,
                ..
            } => {
                assert_eq!(lat, -33.86);
                assert_eq!(hints, vec![HintArg::Highlight, HintArg::SatelliteScan]);
                assert!(offline);
                assert_eq!(steps, 20);
            }
            _ => panic!("expected simulate"),
        }
    }

    #[test]
    fn test_parse_config_set() {
        let cli =
            Cli::try_parse_from(["digzone", "config", "set", "roads.api_key", "abc"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                action: ConfigCommands::Set { .. }
            }
        ));
    }
}
