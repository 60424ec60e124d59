//! Configuration loading
//!
//! Loads the application configuration from environment variables, then
//! files, then defaults.

pub mod loader;

pub use loader::{load, load_from_env, load_from_file, probe_config_paths};
