//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;
use digzone::config::ConfigFileError;
use digzone::road::RoadSnapError;
use digzone::session::SessionError;
use digzone::store::StoreError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Failed to start the async runtime
    Runtime(std::io::Error),
    /// Zone store could not be opened or written
    Store(StoreError),
    /// Road snapping client could not be created
    RoadSnap(RoadSnapError),
    /// The session stopped unexpectedly
    Session(SessionError),
    /// Bad command-line value
    InvalidArgument(String),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::RoadSnap(_) => {
                eprintln!();
                eprintln!("If using the Google Roads API, make sure:");
                eprintln!("  1. Roads API is enabled in Google Cloud Console");
                eprintln!("  2. roads.api_key is set (digzone config set roads.api_key <key>)");
                eprintln!("  3. Or pass --offline to place zones without snapping");
            }
            CliError::Store(StoreError::Serialization(_)) => {
                eprintln!();
                eprintln!("The zones file is not valid JSON. Run 'digzone purge' to reset it.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
            CliError::Store(e) => write!(f, "Zone store error: {}", e),
            CliError::RoadSnap(e) => write!(f, "Failed to create road snapping client: {}", e),
            CliError::Session(e) => write!(f, "Session error: {}", e),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Runtime(e) => Some(e),
            CliError::Store(e) => Some(e),
            CliError::RoadSnap(e) => Some(e),
            CliError::Session(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        CliError::Store(e)
    }
}

impl From<SessionError> for CliError {
    fn from(e: SessionError) -> Self {
        CliError::Session(e)
    }
}
