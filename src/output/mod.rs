//! Output formatting for screentime.
//!
//! This module renders reports, session history and tracking summaries as
//! coloured text, JSON or CSV.

mod csv;
mod json;
mod pretty;

use crate::cli::args::OutputFormat;
use crate::error::ScreenTimeError;
use crate::features::report::Report;
use crate::features::tracking::{Session, TrackingSummary};

pub use csv::*;
pub use json::*;
pub use pretty::*;

/// Format a report based on output format
///
/// # Errors
///
/// Returns `ScreenTimeError::Parse` if JSON serialization fails.
pub fn format_report(report: &Report, format: OutputFormat) -> Result<String, ScreenTimeError> {
    match format {
        OutputFormat::Pretty => Ok(format_report_pretty(report)),
        OutputFormat::Json => format_report_json(report),
        OutputFormat::Csv => Ok(format_report_csv(report)),
    }
}

/// Format stored sessions based on output format
///
/// # Errors
///
/// Returns `ScreenTimeError::Parse` if JSON serialization fails.
pub fn format_sessions(sessions: &[Session], format: OutputFormat) -> Result<String, ScreenTimeError> {
    match format {
        OutputFormat::Pretty => Ok(format_sessions_pretty(sessions)),
        OutputFormat::Json => format_sessions_json(sessions),
        OutputFormat::Csv => Ok(format_sessions_csv(sessions)),
    }
}

/// Format the counters of a finished tracking run
///
/// # Errors
///
/// Returns `ScreenTimeError::Parse` if JSON serialization fails.
pub fn format_summary(summary: &TrackingSummary, format: OutputFormat) -> Result<String, ScreenTimeError> {
    match format {
        OutputFormat::Pretty => Ok(format_summary_pretty(summary)),
        OutputFormat::Json => to_json(summary),
        OutputFormat::Csv => Ok(format_summary_csv(summary)),
    }
}
