//! Calendar-aligned report windows.
//!
//! A window is half-open (`[start, end)`) and aligned to the calendar of the
//! reference time's zone: a day runs midnight to midnight, a week starts on a
//! configurable weekday (Monday by default), a month on its first day.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveDateTime, TimeZone, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::ScreenTimeError;

/// Default first day of a reporting week.
pub const DEFAULT_WEEK_START: Weekday = Weekday::Mon;

/// Kind of report period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    Daily,
    Weekly,
    Monthly,
}

impl PeriodKind {
    /// Get display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
        }
    }

    /// Lowercase identifier used on the command line and in JSON.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl FromStr for PeriodKind {
    type Err = ScreenTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "day" | "d" => Ok(Self::Daily),
            "weekly" | "week" | "w" => Ok(Self::Weekly),
            "monthly" | "month" | "m" => Ok(Self::Monthly),
            _ => Err(ScreenTimeError::InvalidPeriod(s.to_string())),
        }
    }
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a weekday name such as `monday` or `sun`.
///
/// # Errors
///
/// Returns `ScreenTimeError::Config` if the name is not a weekday.
pub fn parse_week_start(s: &str) -> Result<Weekday, ScreenTimeError> {
    s.trim()
        .parse::<Weekday>()
        .map_err(|_| ScreenTimeError::Config(format!("Invalid week start day: {s}")))
}

/// A half-open period window in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodWindow {
    /// Period kind this window was built for
    pub kind: PeriodKind,
    /// Inclusive start
    pub start: DateTime<Utc>,
    /// Exclusive end
    pub end: DateTime<Utc>,
}

impl PeriodWindow {
    /// The window of `kind` that contains `reference`.
    ///
    /// Calendar boundaries are computed in `reference`'s time zone.
    ///
    /// # Errors
    ///
    /// Returns `ScreenTimeError::InvalidPeriod` if a boundary cannot be
    /// represented (out-of-range dates).
    pub fn containing<Tz: TimeZone>(
        kind: PeriodKind,
        reference: &DateTime<Tz>,
        week_start: Weekday,
    ) -> Result<Self, ScreenTimeError> {
        let date = reference.date_naive();
        let out_of_range = || ScreenTimeError::InvalidPeriod(format!("{kind} window out of range"));

        let (first, next) = match kind {
            PeriodKind::Daily => (date, date.succ_opt().ok_or_else(out_of_range)?),
            PeriodKind::Weekly => {
                let first = week_start_on_or_before(date, week_start);
                (first, first + Duration::days(7))
            }
            PeriodKind::Monthly => {
                let first = date.with_day(1).ok_or_else(out_of_range)?;
                let next = first
                    .checked_add_months(Months::new(1))
                    .ok_or_else(out_of_range)?;
                (first, next)
            }
        };

        let tz = reference.timezone();
        Ok(Self {
            kind,
            start: local_midnight(&tz, first).ok_or_else(out_of_range)?,
            end: local_midnight(&tz, next).ok_or_else(out_of_range)?,
        })
    }

    /// Wall-clock length of the window.
    #[must_use]
    pub fn length(&self) -> Duration {
        self.end - self.start
    }

    /// Whether `[start, end)` overlaps this window.
    #[must_use]
    pub fn intersects(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start < self.end && end > self.start
    }

    /// Portion of `[start, end)` that lies inside this window.
    #[must_use]
    pub fn clip(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Duration {
        let clipped_start = start.max(self.start);
        let clipped_end = end.min(self.end);
        if clipped_end > clipped_start {
            clipped_end - clipped_start
        } else {
            Duration::zero()
        }
    }
}

/// Most recent `week_start` on or before `date`.
fn week_start_on_or_before(date: NaiveDate, week_start: Weekday) -> NaiveDate {
    let days_back = (7 + date.weekday().num_days_from_monday()
        - week_start.num_days_from_monday())
        % 7;
    date - Duration::days(i64::from(days_back))
}

/// Start of `date` in `tz`.
///
/// Where a DST jump skips midnight the day starts at the first valid instant
/// after it.
fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Option<DateTime<Utc>> {
    first_instant_of(date, |local| {
        tz.from_local_datetime(&local)
            .earliest()
            .map(|t| t.with_timezone(&Utc))
    })
}

/// Midnight of `date` as resolved by `resolve`, or one hour later if
/// midnight does not exist locally.
fn first_instant_of(
    date: NaiveDate,
    resolve: impl Fn(NaiveDateTime) -> Option<DateTime<Utc>>,
) -> Option<DateTime<Utc>> {
    let midnight = date.and_hms_opt(0, 0, 0)?;
    resolve(midnight).or_else(|| resolve(midnight + Duration::hours(1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_period_kind_from_str() {
        assert_eq!("daily".parse::<PeriodKind>().unwrap(), PeriodKind::Daily);
        assert_eq!("Week".parse::<PeriodKind>().unwrap(), PeriodKind::Weekly);
        assert_eq!("m".parse::<PeriodKind>().unwrap(), PeriodKind::Monthly);
        assert!(matches!(
            "yearly".parse::<PeriodKind>(),
            Err(ScreenTimeError::InvalidPeriod(_))
        ));
    }

    #[test]
    fn test_daily_window() {
        let window =
            PeriodWindow::containing(PeriodKind::Daily, &utc(2024, 3, 14, 12, 0), DEFAULT_WEEK_START)
                .unwrap();
        assert_eq!(window.start, utc(2024, 3, 14, 0, 0));
        assert_eq!(window.end, utc(2024, 3, 15, 0, 0));
        assert_eq!(window.length(), Duration::hours(24));
    }

    #[test]
    fn test_weekly_window_starts_monday() {
        // 2024-03-14 is a Thursday
        let window =
            PeriodWindow::containing(PeriodKind::Weekly, &utc(2024, 3, 14, 9, 30), DEFAULT_WEEK_START)
                .unwrap();
        assert_eq!(window.start, utc(2024, 3, 11, 0, 0));
        assert_eq!(window.end, utc(2024, 3, 18, 0, 0));
    }

    #[test]
    fn test_weekly_window_on_week_start_day() {
        let window =
            PeriodWindow::containing(PeriodKind::Weekly, &utc(2024, 3, 11, 0, 0), DEFAULT_WEEK_START)
                .unwrap();
        assert_eq!(window.start, utc(2024, 3, 11, 0, 0));
    }

    #[test]
    fn test_weekly_window_sunday_start() {
        let window =
            PeriodWindow::containing(PeriodKind::Weekly, &utc(2024, 3, 14, 9, 30), Weekday::Sun)
                .unwrap();
        assert_eq!(window.start, utc(2024, 3, 10, 0, 0));
        assert_eq!(window.end, utc(2024, 3, 17, 0, 0));
    }

    #[test]
    fn test_monthly_window_handles_year_end() {
        let window =
            PeriodWindow::containing(PeriodKind::Monthly, &utc(2023, 12, 31, 23, 59), DEFAULT_WEEK_START)
                .unwrap();
        assert_eq!(window.start, utc(2023, 12, 1, 0, 0));
        assert_eq!(window.end, utc(2024, 1, 1, 0, 0));
    }

    #[test]
    fn test_monthly_window_february_leap_year() {
        let window =
            PeriodWindow::containing(PeriodKind::Monthly, &utc(2024, 2, 10, 8, 0), DEFAULT_WEEK_START)
                .unwrap();
        assert_eq!(window.length(), Duration::days(29));
    }

    #[test]
    fn test_window_uses_reference_time_zone() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        // 23:30 UTC on the 14th is already the 15th at UTC+2
        let reference = utc(2024, 3, 14, 23, 30).with_timezone(&tz);
        let window =
            PeriodWindow::containing(PeriodKind::Daily, &reference, DEFAULT_WEEK_START).unwrap();
        assert_eq!(window.start, utc(2024, 3, 14, 22, 0));
        assert_eq!(window.end, utc(2024, 3, 15, 22, 0));
    }

    #[test]
    fn test_clip_and_intersects() {
        let window =
            PeriodWindow::containing(PeriodKind::Daily, &utc(2024, 3, 14, 12, 0), DEFAULT_WEEK_START)
                .unwrap();

        let start = utc(2024, 3, 13, 23, 0);
        let end = utc(2024, 3, 14, 1, 0);
        assert!(window.intersects(start, end));
        assert_eq!(window.clip(start, end), Duration::hours(1));

        // Touching the boundary is not an intersection
        assert!(!window.intersects(utc(2024, 3, 13, 22, 0), utc(2024, 3, 14, 0, 0)));
        assert_eq!(
            window.clip(utc(2024, 3, 13, 22, 0), utc(2024, 3, 14, 0, 0)),
            Duration::zero()
        );
    }

    /// Local clock at UTC+0 until 2024-03-10 00:00, then UTC+1; local
    /// times from 00:00 to 00:59 that day never happen.
    fn spring_forward_at_midnight(local: NaiveDateTime) -> Option<DateTime<Utc>> {
        let jump = NaiveDate::from_ymd_opt(2024, 3, 10)?.and_hms_opt(0, 0, 0)?;
        if local < jump {
            Some(local.and_utc())
        } else if local < jump + Duration::hours(1) {
            None
        } else {
            Some((local - Duration::hours(1)).and_utc())
        }
    }

    #[test]
    fn test_skipped_midnight_starts_day_an_hour_later() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let next = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
        let before = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();

        let start = first_instant_of(day, spring_forward_at_midnight).unwrap();
        let end = first_instant_of(next, spring_forward_at_midnight).unwrap();

        // 01:00 local at UTC+1
        assert_eq!(start, utc(2024, 3, 10, 0, 0));
        assert_eq!(end, utc(2024, 3, 10, 23, 0));
        assert_eq!(end - start, Duration::hours(23));
        assert_eq!(
            first_instant_of(before, spring_forward_at_midnight).unwrap(),
            utc(2024, 3, 9, 0, 0)
        );
    }

    #[test]
    fn test_unresolvable_day_has_no_start() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(first_instant_of(day, |_| None), None);
    }

    #[test]
    fn test_parse_week_start() {
        assert_eq!(parse_week_start("monday").unwrap(), Weekday::Mon);
        assert_eq!(parse_week_start("Sun").unwrap(), Weekday::Sun);
        assert!(parse_week_start("someday").is_err());
    }
}
