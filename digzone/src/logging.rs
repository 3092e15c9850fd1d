//! Logging setup for DigZone.
//!
//! Log records go to two places:
//! - a log file, truncated at the start of each run
//! - stdout, so a simulated walk can be watched live
//!
//! Filtering follows `RUST_LOG` and falls back to `info`.

use std::fs;
use std::io;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping this guard will flush and close the log file writer.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Initialize logging system.
///
/// Creates the log directory if needed, clears the previous log file,
/// and sets up dual output to both file and stdout.
///
/// # Errors
///
/// Returns error if the directory cannot be created or the file cannot be cleared.
pub fn init_logging(log_dir: &Path, log_file: &str) -> Result<LoggingGuard, io::Error> {
    prepare_log_file(log_dir, log_file)?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_file);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_target(true);

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_ansi(true)
        .compact();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Create `log_dir` and truncate `log_file` inside it.
fn prepare_log_file(log_dir: &Path, log_file: &str) -> io::Result<()> {
    fs::create_dir_all(log_dir)?;
    fs::write(log_dir.join(log_file), "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // init_logging installs a global subscriber, so only the file handling is tested here.

    #[test]
    fn test_creates_nested_directory_and_file() {
        let dir = TempDir::new().unwrap();
        let log_dir = dir.path().join("deep").join("logs");

        prepare_log_file(&log_dir, "digzone.log").unwrap();

        let log_path = log_dir.join("digzone.log");
        assert!(log_path.exists());
        assert_eq!(fs::read_to_string(&log_path).unwrap(), "");
    }

    #[test]
    fn test_clears_existing_file() {
        let dir = TempDir::new().unwrap();
        let log_path = dir.path().join("digzone.log");
        fs::write(&log_path, "old log data").unwrap();

        prepare_log_file(dir.path(), "digzone.log").unwrap();

        assert_eq!(fs::read_to_string(&log_path).unwrap(), "");
    }

    #[test]
    fn test_fails_when_directory_is_a_file() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "x").unwrap();

        assert!(prepare_log_file(&blocker, "digzone.log").is_err());
    }
}
