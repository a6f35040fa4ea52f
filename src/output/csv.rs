//! CSV output formatting for screentime.
//!
//! Fields are quoted per RFC 4180 only when they need it.

use crate::core::format_duration;
use crate::features::report::Report;
use crate::features::tracking::{Session, TrackingSummary};

const REPORT_HEADER: &str = "application_id,seconds,duration,percentage,sessions";
const SESSIONS_HEADER: &str = "id,application_id,start_time,end_time,seconds";
const SUMMARY_HEADER: &str = "sessions_closed,sessions_persisted,probe_failures,store_failures,unsaved";

/// Quote a field if it contains a delimiter, quote or line break.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Format a report as CSV, one row per application
#[must_use]
pub fn format_report_csv(report: &Report) -> String {
    let mut output = String::from(REPORT_HEADER);
    output.push('\n');

    for app in &report.apps {
        output.push_str(&format!(
            "{},{},{},{:.2},{}\n",
            escape(&app.application_id),
            app.duration.num_seconds(),
            format_duration(app.duration),
            app.percentage,
            app.sessions
        ));
    }

    output
}

/// Format sessions as CSV
#[must_use]
pub fn format_sessions_csv(sessions: &[Session]) -> String {
    let mut output = String::from(SESSIONS_HEADER);
    output.push('\n');

    for session in sessions {
        output.push_str(&format!(
            "{},{},{},{},{}\n",
            session.id.map(|id| id.to_string()).unwrap_or_default(),
            escape(&session.application_id),
            session.start_time.to_rfc3339(),
            session.end_time.to_rfc3339(),
            session.duration().num_seconds()
        ));
    }

    output
}

/// Format tracking counters as a single CSV row
#[must_use]
pub fn format_summary_csv(summary: &TrackingSummary) -> String {
    format!(
        "{SUMMARY_HEADER}\n{},{},{},{},{}\n",
        summary.sessions_closed,
        summary.sessions_persisted,
        summary.probe_failures,
        summary.store_failures,
        summary.unsaved.len()
    )
}
