//! User configuration for DigZone.
//!
//! Settings live in `~/.digzone/config.ini` and are split the same way
//! as the file itself:
//!
//! - [`settings`]: one struct per `[section]`
//! - `defaults`: `DEFAULT_*` constants and `Default` impls
//! - `parser` / `writer`: INI in and out
//! - [`keys`]: dotted key access for `digzone config get/set`
//!
//! # Example
//!
//! ```no_run
//! use digzone::config::ConfigFile;
//!
//! let config = ConfigFile::load()?;
//! let generator = config.generator_config();
//! assert!(generator.zones_per_batch > 0);
//! # Ok::<(), digzone::config::ConfigFileError>(())
//! ```

mod defaults;
mod file;
mod keys;
mod parser;
pub mod settings;
mod writer;

pub use file::{
    config_directory, config_file_path, default_log_file, default_zones_file, ConfigFile,
    ConfigFileError, DEFAULT_LOG_FILE_NAME, DEFAULT_PURGE_INTERVAL_HOURS,
    DEFAULT_ZONES_FILE_NAME,
};
pub use keys::{ConfigKey, ConfigKeyError};
pub use settings::*;
