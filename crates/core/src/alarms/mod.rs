//! Alarm management for the editor surface

pub mod service;

pub use service::AlarmService;
