//! Usage reports.
//!
//! Sums closed sessions into per-application totals over daily, weekly and
//! monthly calendar windows.

pub mod aggregator;

pub use aggregator::{AppUsage, Report, ReportAggregator};
