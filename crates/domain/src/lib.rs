//! # Alarmclock Domain
//!
//! Business domain types for the alarm scheduling core.
//!
//! This crate contains:
//! - Alarm definitions, repeat-day sets and timer keys
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other alarmclock crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
