//! JSON output formatting for screentime.

use serde::Serialize;
use serde_json::json;

use crate::error::ScreenTimeError;
use crate::features::report::Report;
use crate::features::tracking::Session;

/// Format a report as JSON
///
/// # Errors
///
/// Returns `ScreenTimeError::Parse` if JSON serialization fails.
pub fn format_report_json(report: &Report) -> Result<String, ScreenTimeError> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Format sessions as JSON, with each session's length in seconds
///
/// # Errors
///
/// Returns `ScreenTimeError::Parse` if JSON serialization fails.
pub fn format_sessions_json(sessions: &[Session]) -> Result<String, ScreenTimeError> {
    let items: Vec<_> = sessions
        .iter()
        .map(|s| {
            json!({
                "id": s.id,
                "application_id": s.application_id,
                "start_time": s.start_time,
                "end_time": s.end_time,
                "seconds": s.duration().num_seconds(),
            })
        })
        .collect();

    let output = json!({
        "count": sessions.len(),
        "items": items
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Generic JSON formatter for any serializable type
///
/// # Errors
///
/// Returns `ScreenTimeError::Parse` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, ScreenTimeError> {
    Ok(serde_json::to_string_pretty(value)?)
}
