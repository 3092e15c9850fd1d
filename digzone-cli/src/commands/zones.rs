//! Zones command - list zones visible from a position.

use std::sync::Arc;

use digzone::generator::ZoneGenerator;
use digzone::geo::GeoPoint;
use digzone::visibility::{VisibilityError, VisibilityTracker};
use digzone::zone::Zone;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the zones command.
pub struct ZonesArgs {
    pub lat: f64,
    pub lng: f64,
}

/// Run the zones command.
///
/// Reads the store only; nothing is generated.
pub fn run(args: ZonesArgs) -> Result<(), CliError> {
    let player = GeoPoint::new(args.lat, args.lng);
    if !player.is_valid() {
        return Err(CliError::InvalidArgument(format!(
            "{}, {} is not a valid position",
            args.lat, args.lng
        )));
    }

    let runner = CliRunner::new()?;
    runner.log_startup("zones");

    let mut zones = runner.block_on(async {
        let store = Arc::new(runner.open_store().await?);
        let snapper = runner.snapper(true)?;
        let generator = ZoneGenerator::with_config(snapper, runner.config().generator_config());
        let tracker = VisibilityTracker::new(store, Arc::new(generator));

        tracker.visible_zones(player).await.map_err(|e| match e {
            VisibilityError::Store(e) => CliError::Store(e),
            other => CliError::InvalidArgument(other.to_string()),
        })
    })?;

    sort_by_distance(&mut zones, &player);

    println!(
        "{} zone(s) within {}m of {:.6}, {:.6}",
        zones.len(),
        runner.config().game.aura_radius,
        player.lat,
        player.lng
    );
    for zone in &zones {
        println!("  {}", format_zone(zone, &player));
    }
    Ok(())
}

fn sort_by_distance(zones: &mut [Zone], player: &GeoPoint) {
    zones.sort_by(|a, b| {
        a.distance_from_center(player)
            .total_cmp(&b.distance_from_center(player))
    });
}

fn format_zone(zone: &Zone, player: &GeoPoint) -> String {
    let status = if zone.is_collected { "dug" } else { "buried" };
    format!(
        "{:<32} {:>7.0}m  ({:.6}, {:.6})  {}",
        zone.id,
        zone.distance_from_center(player),
        zone.center_lat,
        zone.center_lng,
        status
    )
}
