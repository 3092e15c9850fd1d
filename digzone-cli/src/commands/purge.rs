//! Purge command - delete every stored zone.

use digzone::jobs::ZonePurgeDaemon;
use std::sync::Arc;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the purge command.
pub fn run() -> Result<(), CliError> {
    let runner = CliRunner::new()?;
    runner.log_startup("purge");

    let deleted = runner.block_on(async {
        let store = runner.open_store().await?;
        let daemon = ZonePurgeDaemon::new(Arc::new(store));
        daemon.purge_now().await.map_err(CliError::from)
    })?;

    println!(
        "Deleted {} zone(s) from {}",
        deleted,
        runner.config().store.zones_file.display()
    );
    Ok(())
}
