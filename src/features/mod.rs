//! Feature implementations for screentime.
//!
//! - Foreground tracking: session state machine, polling loop, session store
//! - Reports: calendar-window aggregation of stored sessions

pub mod report;
pub mod tracking;
