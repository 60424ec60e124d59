//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `ALARMCLOCK_DB_PATH` is unset, falls back to loading from file
//! 3. Probes multiple paths for config files (JSON or TOML)
//! 4. With no file anywhere, uses the built-in defaults
//!
//! The result is validated before it is returned.
//!
//! ## Environment Variables
//! - `ALARMCLOCK_DB_PATH`: Database file path (required for env loading)
//! - `ALARMCLOCK_DB_POOL_SIZE`: Connection pool size
//! - `ALARMCLOCK_SNOOZE_MINUTES`: Snooze length in minutes
//! - `ALARMCLOCK_EVENT_BUFFER`: Capacity of the fired-event channel
//! - `ALARMCLOCK_LOG_LEVEL`: Default tracing level
//! - `ALARMCLOCK_LOG_JSON`: Emit JSON log lines (true/false)
//!
//! ## File Locations
//! The loader probes `config.{json,toml}` and `alarmclock.{json,toml}` in the
//! current directory, then `config.{json,toml}` in its parent and
//! grandparent, then the same set relative to the executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use alarmclock_domain::{
    AlarmError, Config, DatabaseConfig, LoggingConfig, Result, SchedulingConfig,
};

const DB_PATH_VAR: &str = "ALARMCLOCK_DB_PATH";
const FILE_NAMES: [&str; 4] = ["config.json", "config.toml", "alarmclock.json", "alarmclock.toml"];
const PARENT_FILE_NAMES: [&str; 4] =
    ["../config.json", "../config.toml", "../../config.json", "../../config.toml"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `AlarmError::Config` if a source is present but malformed, or if
/// the loaded configuration fails validation.
pub fn load() -> Result<Config> {
    let config = if std::env::var_os(DB_PATH_VAR).is_some() {
        let config = load_from_env()?;
        tracing::info!("Configuration loaded from environment variables");
        config
    } else {
        tracing::debug!("{DB_PATH_VAR} not set, trying file");
        match probe_config_paths() {
            Some(path) => load_from_file(Some(path))?,
            None => {
                tracing::info!("No config file found, using defaults");
                Config::default()
            }
        }
    };

    config.validate()?;
    Ok(config)
}

/// Load configuration from environment variables
///
/// `ALARMCLOCK_DB_PATH` must be set; every other variable falls back to
/// its default.
///
/// # Errors
/// Returns `AlarmError::Config` if the path is missing or a numeric
/// variable does not parse.
pub fn load_from_env() -> Result<Config> {
    let path = env_var(DB_PATH_VAR)?;
    let defaults = Config::default();

    let pool_size = env_parse("ALARMCLOCK_DB_POOL_SIZE", defaults.database.pool_size)?;
    let snooze_minutes =
        env_parse("ALARMCLOCK_SNOOZE_MINUTES", defaults.scheduling.snooze_minutes)?;
    let event_buffer = env_parse("ALARMCLOCK_EVENT_BUFFER", defaults.scheduling.event_buffer)?;
    let level = std::env::var("ALARMCLOCK_LOG_LEVEL").unwrap_or(defaults.logging.level);
    let json = env_bool("ALARMCLOCK_LOG_JSON", defaults.logging.json);

    Ok(Config {
        database: DatabaseConfig { path, pool_size },
        scheduling: SchedulingConfig { snooze_minutes, event_buffer },
        logging: LoggingConfig { level, json },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations.
///
/// # Errors
/// Returns `AlarmError::Config` if the file is missing, unreadable, or not
/// valid JSON/TOML.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(AlarmError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            AlarmError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| AlarmError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| AlarmError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| AlarmError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(AlarmError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe the standard locations for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidates_in(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidates_in(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidates_in(dir: &Path) -> impl Iterator<Item = PathBuf> + '_ {
    FILE_NAMES.iter().chain(PARENT_FILE_NAMES.iter()).map(move |name| dir.join(name))
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| AlarmError::Config(format!("Missing required environment variable: {key}")))
}

fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| AlarmError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(default),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
