//! Foreground application tracking.
//!
//! Samples the focused application on a fixed interval and turns the samples
//! into closed usage sessions:
//! - Session model and tracker state
//! - Switch detection and coalescing
//! - Cancellable polling loop with shutdown flush
//! - SQLite session storage

mod runner;
pub mod session;
pub mod storage;
pub mod tracker;

pub use session::{Sample, Session, TrackingState};
pub use storage::SqliteUsageStore;
pub use tracker::{SessionTracker, TrackerConfig, TrackingSummary};
