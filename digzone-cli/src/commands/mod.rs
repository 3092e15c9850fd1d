//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`config`] - Configuration management (get, set, list, path)
//! - [`purge`] - Delete every stored zone
//! - [`simulate`] - Walk a simulated player through a session
//! - [`zones`] - List zones visible from a position

pub mod config;
pub mod purge;
pub mod simulate;
pub mod zones;
