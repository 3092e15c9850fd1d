//! Simulate command - walk a virtual player through a full session.
//!
//! The walk is driven by [`WalkSimulator`]; zones come from and go to the
//! configured zones file, so repeated runs see each other's zones.

use std::sync::Arc;
use std::time::Duration;

use clap::ValueEnum;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tracing::info;

use digzone::generator::ZoneGenerator;
use digzone::geo::GeoPoint;
use digzone::inventory::{InventorySummary, MemoryInventory};
use digzone::location::WalkSimulator;
use digzone::profile::MemoryProfileStore;
use digzone::session::{
    HintKind, PurchaseOutcome, SessionController, SessionEvent, SessionHandle,
};
use digzone::visibility::VisibilityTracker;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Time allowed after the last fix for refreshes to settle.
const SETTLE_TIME: Duration = Duration::from_secs(2);

/// Hint selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HintArg {
    /// Mark the nearest zone
    Highlight,
    /// Dig up a zone without walking to it
    RemoteCollect,
    /// Reveal what is buried in every visible zone
    SatelliteScan,
}

impl From<HintArg> for HintKind {
    fn from(arg: HintArg) -> Self {
        match arg {
            HintArg::Highlight => HintKind::Highlight,
            HintArg::RemoteCollect => HintKind::RemoteCollect,
            HintArg::SatelliteScan => HintKind::SatelliteScan,
        }
    }
}

/// Arguments for the simulate command.
pub struct SimulateArgs {
    pub lat: f64,
    pub lng: f64,
    pub bearing: f64,
    pub speed: f64,
    pub steps: usize,
    pub interval_ms: Option<u64>,
    pub balance: u64,
    pub offline: bool,
    pub hints: Vec<HintArg>,
}

/// Run the simulate command.
pub fn run(args: SimulateArgs) -> Result<(), CliError> {
    let start = GeoPoint::new(args.lat, args.lng);
    if !start.is_valid() {
        return Err(CliError::InvalidArgument(format!(
            "{}, {} is not a valid position",
            args.lat, args.lng
        )));
    }
    if !(args.speed.is_finite() && args.speed >= 0.0) {
        return Err(CliError::InvalidArgument(
            "--speed must be zero or positive".to_string(),
        ));
    }

    let runner = CliRunner::new()?;
    runner.log_startup("simulate");
    let config = runner.config();

    let mut session_config = config.session_config();
    if let Some(ms) = args.interval_ms {
        session_config.update_interval = Duration::from_millis(ms.max(1));
    }
    let interval = session_config.update_interval;
    let walk_time = walk_duration(interval, args.steps)?;

    let snapper = runner.snapper(args.offline)?;

    println!("DigZone Walk Simulation v{}", digzone::VERSION);
    println!("==========================");
    println!();
    println!("Start:    {:.6}, {:.6}", start.lat, start.lng);
    println!(
        "Walk:     {} fixes every {}ms, bearing {}°, {} m/s",
        args.steps,
        interval.as_millis(),
        args.bearing,
        args.speed
    );
    println!("Roads:    {}", snapper.describe());
    println!("Zones:    {}", config.store.zones_file.display());
    println!("Balance:  {} steps", args.balance);
    println!();

    let generator = ZoneGenerator::with_config(snapper, config.generator_config());
    let walk = WalkSimulator::new(start)
        .with_bearing(args.bearing)
        .with_speed(args.speed)
        .with_steps(args.steps);

    let summary = runner.block_on(async {
        let store = Arc::new(runner.open_store().await?);
        let tracker = VisibilityTracker::new(store, Arc::new(generator));
        let profile = Arc::new(MemoryProfileStore::with_balance(args.balance));
        let inventory = Arc::new(MemoryInventory::new());

        let controller = SessionController::new(
            tracker,
            Arc::clone(&profile),
            Arc::clone(&inventory),
            session_config,
        );
        let mut events = controller.subscribe();
        let shutdown = CancellationToken::new();
        let (handle, task) = controller.spawn(walk, shutdown.clone());

        let mut pending_hints = args.hints.clone();
        let deadline = tokio::time::sleep(walk_time);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                _ = &mut deadline => break,
                _ = tokio::signal::ctrl_c() => {
                    println!();
                    println!("Interrupted.");
                    break;
                }
                event = events.recv() => match event {
                    Ok(event) => {
                        print_event(&event);
                        if matches!(event, SessionEvent::ZonesUpdated { .. })
                            && !pending_hints.is_empty()
                        {
                            buy_hints(&handle, std::mem::take(&mut pending_hints)).await?;
                        }
                    }
                    Err(RecvError::Lagged(n)) => info!(skipped = n, "Event output fell behind"),
                    Err(RecvError::Closed) => break,
                },
            }
        }

        let snapshot = handle.snapshot().await?;
        shutdown.cancel();
        let _ = task.await;

        println!();
        println!(
            "Finished at {:?} with {} visible zone(s), {} steps left",
            snapshot.location,
            snapshot.visible_zones.len(),
            profile.profile().balance
        );
        Ok::<InventorySummary, CliError>(inventory.summary())
    })?;

    print_inventory(&summary);
    Ok(())
}

/// Time to let the session run: one interval per fix plus [`SETTLE_TIME`].
fn walk_duration(interval: Duration, steps: usize) -> Result<Duration, CliError> {
    u32::try_from(steps)
        .ok()
        .and_then(|steps| interval.checked_mul(steps))
        .and_then(|walk| walk.checked_add(SETTLE_TIME))
        .ok_or_else(|| {
            CliError::InvalidArgument(format!(
                "{} fixes every {}ms is too long a walk",
                steps,
                interval.as_millis()
            ))
        })
}

async fn buy_hints(handle: &SessionHandle, hints: Vec<HintArg>) -> Result<(), CliError> {
    for hint in hints {
        let kind = HintKind::from(hint);
        match handle.purchase(kind).await? {
            PurchaseOutcome::Applied(effect) => println!("  hint {kind}: {effect:?}"),
            PurchaseOutcome::Declined(reason) => println!("  hint {kind} declined: {reason}"),
        }
    }
    Ok(())
}

fn print_event(event: &SessionEvent) {
    match event {
        SessionEvent::PhaseChanged(phase) => println!("Session {:?}", phase),
        SessionEvent::LocationAccepted { position, sequence } => {
            println!("#{sequence:<4} at {:.6}, {:.6}", position.lat, position.lng)
        }
        SessionEvent::LocationRejected { position } => {
            println!("     ignored fix {}, {}", position.lat, position.lng)
        }
        SessionEvent::ZonesUpdated {
            sequence,
            visible,
            generated,
        } => {
            let note = if *generated { " (new batch)" } else { "" };
            println!("#{sequence:<4} {visible} zone(s) nearby{note}");
        }
        SessionEvent::RefreshFailed { sequence, error } => {
            println!("#{sequence:<4} refresh failed: {error}")
        }
        SessionEvent::BoneCollected {
            zone_id,
            bone,
            remote,
        } => {
            let how = if *remote { "remotely " } else { "" };
            println!(
                "  Dug up {}{} {} in {}",
                how,
                bone.rarity.adjective(),
                bone.name,
                zone_id
            );
        }
        SessionEvent::ZoneHighlighted { zone_id } => println!("  Highlighted {zone_id}"),
        SessionEvent::BonesRevealed { zone_ids } => {
            println!("  Scan revealed {} zone(s)", zone_ids.len())
        }
    }
}

fn print_inventory(summary: &InventorySummary) {
    println!();
    println!("Inventory: {} bone(s)", summary.total);
    for stack in &summary.stacks {
        println!("  {:>3} x {:<28} [{}]", stack.count, stack.name, stack.rarity);
    }
}
