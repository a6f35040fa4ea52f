use std::path::Path;

use chrono::{Local, NaiveDate, TimeZone};

use crate::cli::args::{OutputFormat, ReportArgs};
use crate::config::Config;
use crate::core::PeriodKind;
use crate::error::ScreenTimeError;
use crate::features::report::ReportAggregator;
use crate::output::format_report;

use super::open_store;

/// Execute the report command.
///
/// Without `--date` the window containing the current moment is reported;
/// with it, the window containing noon of that local date.
///
/// # Errors
///
/// Returns `InvalidPeriod` for an unknown `--period`, `InvalidInput` for a
/// malformed `--date`, and store or I/O errors from reading sessions or
/// writing `--file`.
pub fn report(
    args: &ReportArgs,
    config: &Config,
    db: Option<&Path>,
    format: OutputFormat,
) -> Result<String, ScreenTimeError> {
    let kind = match &args.period {
        Some(period) => period.parse::<PeriodKind>()?,
        None => config.report.default_period,
    };
    let week_start = config.report.week_start()?;

    let store = open_store(db)?;
    let aggregator = ReportAggregator::new(&store).with_week_start(week_start);

    let report = match &args.date {
        Some(date) => {
            let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| {
                ScreenTimeError::InvalidInput(format!("Invalid date '{date}' (expected YYYY-MM-DD): {e}"))
            })?;
            let noon = date
                .and_hms_opt(12, 0, 0)
                .and_then(|naive| Local.from_local_datetime(&naive).earliest())
                .ok_or_else(|| ScreenTimeError::InvalidInput(format!("Invalid local date '{date}'")))?;
            aggregator.aggregate(kind, &noon)?
        }
        None => aggregator.aggregate_now(kind)?,
    };
    log::info!(
        "{} report: {} applications",
        kind.display_name(),
        report.apps.len()
    );

    let rendered = format_report(&report, format)?;

    match &args.file {
        Some(path) => {
            std::fs::write(path, &rendered)?;
            Ok(format!("Report written to {}", path.display()))
        }
        None => Ok(rendered),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::tracking::Session;
    use chrono::{Duration, Utc};
    use tempfile::TempDir;

    fn seeded_db(temp_dir: &TempDir) -> std::path::PathBuf {
        let db_path = temp_dir.path().join("usage.db");
        let store = open_store(Some(&db_path)).unwrap();

        let start = Local
            .with_ymd_and_hms(2024, 3, 6, 9, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        let mut editor = Session::new("Editor", start, start + Duration::hours(2));
        let mut browser = Session::new(
            "Browser",
            start + Duration::hours(2),
            start + Duration::hours(3),
        );
        store.insert(&mut editor).unwrap();
        store.insert(&mut browser).unwrap();
        db_path
    }

    fn args(period: Option<&str>, date: Option<&str>) -> ReportArgs {
        ReportArgs {
            period: period.map(str::to_string),
            date: date.map(str::to_string),
            file: None,
        }
    }

    #[test]
    fn test_report_for_date() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = seeded_db(&temp_dir);

        let output = report(
            &args(Some("daily"), Some("2024-03-06")),
            &Config::default(),
            Some(&db_path),
            OutputFormat::Csv,
        )
        .unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "Editor,7200,2h 0m 0s,66.67,1");
        assert_eq!(lines[2], "Browser,3600,1h 0m 0s,33.33,1");
    }

    #[test]
    fn test_report_other_day_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = seeded_db(&temp_dir);

        let output = report(
            &args(Some("daily"), Some("2024-03-07")),
            &Config::default(),
            Some(&db_path),
            OutputFormat::Json,
        )
        .unwrap();

        assert!(output.contains("\"apps\": []"));
        assert!(output.contains("\"total_seconds\": 0"));
    }

    #[test]
    fn test_report_uses_configured_default_period() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = seeded_db(&temp_dir);
        let mut config = Config::default();
        config.report.default_period = PeriodKind::Monthly;

        let output = report(
            &args(None, Some("2024-03-20")),
            &config,
            Some(&db_path),
            OutputFormat::Json,
        )
        .unwrap();

        assert!(output.contains("\"period\": \"monthly\""));
        assert!(output.contains("\"total_seconds\": 10800"));
    }

    #[test]
    fn test_report_invalid_period() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("usage.db");

        let err = report(
            &args(Some("fortnightly"), None),
            &Config::default(),
            Some(&db_path),
            OutputFormat::Pretty,
        )
        .unwrap_err();

        assert!(matches!(err, ScreenTimeError::InvalidPeriod(_)));
    }

    #[test]
    fn test_report_invalid_date() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("usage.db");

        let err = report(
            &args(Some("daily"), Some("06/03/2024")),
            &Config::default(),
            Some(&db_path),
            OutputFormat::Pretty,
        )
        .unwrap_err();

        assert!(matches!(err, ScreenTimeError::InvalidInput(_)));
    }

    #[test]
    fn test_report_written_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = seeded_db(&temp_dir);
        let out_path = temp_dir.path().join("report.csv");

        let mut report_args = args(Some("weekly"), Some("2024-03-06"));
        report_args.file = Some(out_path.clone());

        let message = report(&report_args, &Config::default(), Some(&db_path), OutputFormat::Csv).unwrap();

        assert!(message.starts_with("Report written to"));
        let written = std::fs::read_to_string(&out_path).unwrap();
        assert!(written.starts_with("application_id,seconds,duration,percentage,sessions\n"));
        assert!(written.contains("Editor,7200"));
    }
}
