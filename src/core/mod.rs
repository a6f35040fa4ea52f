//! Core abstractions for screentime.
//!
//! This module provides the capability traits the tracker is built against
//! and the time utilities shared by tracking and reporting.

pub mod duration;
mod period;
mod traits;

pub use duration::{format_duration, parse_interval};
pub use period::{parse_week_start, PeriodKind, PeriodWindow, DEFAULT_WEEK_START};
pub use traits::{ForegroundProbe, UsageStore};

#[cfg(test)]
pub use traits::{MockForegroundProbe, MockUsageStore};
