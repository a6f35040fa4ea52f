//! screentime - foreground application usage tracker
//!
//! This crate samples the focused application, records contiguous focus
//! intervals as sessions in `SQLite`, and aggregates them into daily, weekly
//! and monthly usage reports.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod features;
pub mod output;
pub mod platform;
pub mod storage;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::ScreenTimeError;
pub use features::report::{Report, ReportAggregator};
pub use features::tracking::{Session, SessionTracker, SqliteUsageStore, TrackerConfig, TrackingSummary};
