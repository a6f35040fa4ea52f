//! Configuration management for screentime.
//!
//! This module handles loading configuration from `~/.screentime/`.

mod paths;
mod settings;

pub use paths::Paths;
pub use settings::{Config, GeneralConfig, ReportConfig, TrackerSettings};
