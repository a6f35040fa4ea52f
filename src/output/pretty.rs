use colored::Colorize;

use crate::core::format_duration;
use crate::features::report::Report;
use crate::features::tracking::{Session, TrackingSummary};

/// Format a report as a coloured table, longest-used application first
pub fn format_report_pretty(report: &Report) -> String {
    let start = report.window_start.with_timezone(&chrono::Local);
    let end = report.window_end.with_timezone(&chrono::Local);

    let mut output = format!(
        "{} report  {} → {}\n",
        report.period.display_name().bold(),
        start.format("%Y-%m-%d %H:%M"),
        end.format("%Y-%m-%d %H:%M")
    );
    output.push_str(&"─".repeat(60));
    output.push('\n');

    if report.is_empty() {
        output.push_str("  No usage recorded");
        return output;
    }

    let width = report
        .apps
        .iter()
        .map(|app| app.application_id.chars().count())
        .max()
        .unwrap_or(0);

    for app in &report.apps {
        let sessions = if app.sessions == 1 {
            "1 session".to_string()
        } else {
            format!("{} sessions", app.sessions)
        };
        output.push_str(&format!(
            "  {:<width$}  {:>12}  {:>7}  {}\n",
            app.application_id.bold(),
            format_duration(app.duration).cyan(),
            format!("{:.2}%", app.percentage).yellow(),
            sessions.dimmed(),
        ));
    }

    output.push_str(&"─".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "  {} {}",
        "Total:".dimmed(),
        format_duration(report.total).bold()
    ));

    output
}

/// Format stored sessions, newest first as given
pub fn format_sessions_pretty(sessions: &[Session]) -> String {
    if sessions.is_empty() {
        return "Sessions (0)\n  No sessions recorded".to_string();
    }

    let mut output = format!("Sessions ({})\n", sessions.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for session in sessions {
        let start = session.start_time_local();
        let end = session.end_time_local();
        output.push_str(&format!(
            "  {} {}-{}  {}  {}\n",
            start.format("%Y-%m-%d").to_string().dimmed(),
            start.format("%H:%M:%S"),
            end.format("%H:%M:%S"),
            format_duration(session.duration()).cyan(),
            session.application_id.bold()
        ));
    }

    output
}

/// Format the counters of a finished tracking run
pub fn format_summary_pretty(summary: &TrackingSummary) -> String {
    let mut output = format!(
        "{} {} sessions closed, {} saved\n",
        "Tracking stopped:".bold(),
        summary.sessions_closed,
        summary.sessions_persisted
    );

    if summary.probe_failures > 0 {
        output.push_str(&format!(
            "  {} {}\n",
            "Probe failures:".dimmed(),
            summary.probe_failures
        ));
    }

    if summary.store_failures > 0 {
        output.push_str(&format!(
            "  {} {}\n",
            "Store failures:".dimmed(),
            summary.store_failures
        ));
    }

    if !summary.unsaved.is_empty() {
        output.push_str(&format!(
            "  {}\n",
            format!("{} sessions could not be saved:", summary.unsaved.len()).red()
        ));
        for session in &summary.unsaved {
            output.push_str(&format!(
                "    {} {} ({})\n",
                session.start_time_local().format("%Y-%m-%d %H:%M:%S"),
                session.application_id,
                format_duration(session.duration())
            ));
        }
    }

    output.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PeriodKind;
    use crate::features::report::AppUsage;
    use chrono::{Duration, TimeZone, Utc};

    fn no_color() {
        colored::control::set_override(false);
    }

    fn make_report(apps: Vec<AppUsage>) -> Report {
        let total = apps.iter().map(|a| a.duration).fold(Duration::zero(), |acc, d| acc + d);
        Report {
            period: PeriodKind::Daily,
            window_start: Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap(),
            window_end: Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap(),
            total,
            apps,
        }
    }

    #[test]
    fn test_format_report_pretty_empty() {
        no_color();
        let result = format_report_pretty(&make_report(vec![]));

        assert!(result.contains("Daily report"));
        assert!(result.contains("No usage recorded"));
    }

    #[test]
    fn test_format_report_pretty_lists_apps() {
        no_color();
        let report = make_report(vec![
            AppUsage {
                application_id: "Firefox".to_string(),
                duration: Duration::minutes(90),
                percentage: 75.0,
                sessions: 3,
            },
            AppUsage {
                application_id: "Terminal".to_string(),
                duration: Duration::minutes(30),
                percentage: 25.0,
                sessions: 1,
            },
        ]);
        let result = format_report_pretty(&report);

        assert!(result.contains("Firefox"));
        assert!(result.contains("1h 30m 0s"));
        assert!(result.contains("75.00%"));
        assert!(result.contains("3 sessions"));
        assert!(result.contains("1 session\n"));
        assert!(result.contains("Total: 2h 0m 0s"));
        assert!(result.find("Firefox") < result.find("Terminal"));
    }

    #[test]
    fn test_format_sessions_pretty_empty() {
        no_color();
        assert_eq!(
            format_sessions_pretty(&[]),
            "Sessions (0)\n  No sessions recorded"
        );
    }

    #[test]
    fn test_format_sessions_pretty() {
        no_color();
        let start = Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap();
        let sessions = vec![Session::new("Terminal", start, start + Duration::seconds(95))];
        let result = format_sessions_pretty(&sessions);

        assert!(result.starts_with("Sessions (1)"));
        assert!(result.contains("1m 35s"));
        assert!(result.contains("Terminal"));
    }

    #[test]
    fn test_format_summary_pretty_reports_unsaved() {
        no_color();
        let start = Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap();
        let summary = TrackingSummary {
            sessions_closed: 2,
            sessions_persisted: 1,
            store_failures: 4,
            unsaved: vec![Session::new("Editor", start, start + Duration::minutes(5))],
            ..TrackingSummary::default()
        };
        let result = format_summary_pretty(&summary);

        assert!(result.contains("2 sessions closed, 1 saved"));
        assert!(result.contains("Store failures: 4"));
        assert!(result.contains("1 sessions could not be saved"));
        assert!(result.contains("Editor (5m 0s)"));
        assert!(!result.contains("Probe failures"));
    }
}
