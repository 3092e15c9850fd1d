//! Background jobs that run alongside player sessions.
//!
//! - [`ZonePurgeDaemon`] - wipes the zone store on a fixed interval

mod purge;

pub use purge::{ZonePurgeDaemon, DEFAULT_PURGE_INTERVAL_SECS, DEFAULT_RETRY_DELAY_SECS};
