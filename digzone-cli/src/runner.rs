//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization, the async runtime
//! and collaborator construction shared by the command handlers.

use std::future::Future;
use std::path::Path;

use tokio::runtime::Runtime;
use tracing::info;

use digzone::config::{ConfigFile, DEFAULT_LOG_FILE_NAME};
use digzone::geo::GeoPoint;
use digzone::logging::{init_logging, LoggingGuard};
use digzone::road::{
    AsyncReqwestClient, GoogleRoadsClient, PassthroughSnapper, RoadSnapClient, RoadSnapError,
};
use digzone::store::FileZoneStore;

use crate::error::CliError;

/// Road snapper chosen at startup.
pub enum Snapper {
    Google(GoogleRoadsClient<AsyncReqwestClient>),
    Passthrough(PassthroughSnapper),
}

impl Snapper {
    pub fn describe(&self) -> &'static str {
        match self {
            Snapper::Google(_) => "Google Roads API",
            Snapper::Passthrough(_) => "none (offline)",
        }
    }
}

impl RoadSnapClient for Snapper {
    async fn snap_to_road(&self, point: GeoPoint) -> Result<Option<GeoPoint>, RoadSnapError> {
        match self {
            Snapper::Google(client) => client.snap_to_road(point).await,
            Snapper::Passthrough(passthrough) => passthrough.snap_to_road(point).await,
        }
    }
}

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    config: ConfigFile,
    runtime: Runtime,
}

impl CliRunner {
    /// Create a new CLI runner, loading config and initializing logging.
    pub fn new() -> Result<Self, CliError> {
        let config = ConfigFile::load()?;

        let log_path = &config.logging.file;
        let log_dir = log_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let log_file = log_path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| DEFAULT_LOG_FILE_NAME.to_string());

        let logging_guard = init_logging(log_dir, &log_file)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        let runtime = Runtime::new().map_err(CliError::Runtime)?;

        Ok(Self {
            logging_guard,
            config,
            runtime,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("DigZone v{}", digzone::VERSION);
        info!("DigZone CLI: {} command", command);
    }

    /// Run a future to completion on the runner's runtime.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Open the file-backed zone store named in the config.
    pub async fn open_store(&self) -> Result<FileZoneStore, CliError> {
        let path = &self.config.store.zones_file;
        info!(path = %path.display(), "Opening zone store");
        Ok(FileZoneStore::open(path.clone()).await?)
    }

    /// Build the road snapper.
    ///
    /// Without an API key, or with `offline`, candidates are used as-is.
    pub fn snapper(&self, offline: bool) -> Result<Snapper, CliError> {
        let roads = &self.config.roads;
        match (&roads.api_key, offline) {
            (Some(key), false) => {
                let http =
                    AsyncReqwestClient::with_timeout(roads.timeout_secs).map_err(CliError::RoadSnap)?;
                Ok(Snapper::Google(GoogleRoadsClient::with_base_url(
                    http,
                    key.clone(),
                    roads.base_url.clone(),
                )))
            }
            _ => Ok(Snapper::Passthrough(PassthroughSnapper)),
        }
    }
}
