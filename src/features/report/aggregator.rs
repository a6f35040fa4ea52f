//! Report aggregation.
//!
//! Reads the sessions intersecting a period window and clips each one to the
//! window before summing, so a session crossing midnight (or a week/month
//! boundary) is split between the adjacent windows instead of being counted
//! twice or dropped.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Local, TimeZone, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::core::duration::as_seconds;
use crate::core::{PeriodKind, PeriodWindow, UsageStore, DEFAULT_WEEK_START};
use crate::error::ScreenTimeError;

/// Usage of one application within a report window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppUsage {
    /// Application identifier
    pub application_id: String,
    /// Time in focus inside the window
    #[serde(rename = "seconds", with = "as_seconds")]
    pub duration: Duration,
    /// Share of the tracked total, 0-100 with two decimals
    pub percentage: f64,
    /// Sessions that contributed
    pub sessions: usize,
}

/// Aggregated usage for one period window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Period kind
    pub period: PeriodKind,
    /// Inclusive window start
    pub window_start: DateTime<Utc>,
    /// Exclusive window end
    pub window_end: DateTime<Utc>,
    /// Total tracked time inside the window
    #[serde(rename = "total_seconds", with = "as_seconds")]
    pub total: Duration,
    /// Per-application usage, longest first
    pub apps: Vec<AppUsage>,
}

impl Report {
    /// Window this report covers.
    #[must_use]
    pub const fn window(&self) -> PeriodWindow {
        PeriodWindow {
            kind: self.period,
            start: self.window_start,
            end: self.window_end,
        }
    }

    /// Application id to total duration.
    #[must_use]
    pub fn totals(&self) -> BTreeMap<String, Duration> {
        self.apps
            .iter()
            .map(|app| (app.application_id.clone(), app.duration))
            .collect()
    }

    /// Total for one application, zero if it was never focused.
    #[must_use]
    pub fn total_for(&self, application_id: &str) -> Duration {
        self.apps
            .iter()
            .find(|app| app.application_id == application_id)
            .map_or_else(Duration::zero, |app| app.duration)
    }

    /// Whether nothing was tracked in the window.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }
}

/// Builds [`Report`]s from a [`UsageStore`].
pub struct ReportAggregator<'a, S: UsageStore> {
    store: &'a S,
    week_start: Weekday,
}

impl<'a, S: UsageStore> ReportAggregator<'a, S> {
    /// Create an aggregator with weeks starting on Monday.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self {
            store,
            week_start: DEFAULT_WEEK_START,
        }
    }

    /// Use a different first day of the week.
    #[must_use]
    pub fn with_week_start(mut self, week_start: Weekday) -> Self {
        self.week_start = week_start;
        self
    }

    /// Aggregate the window of `kind` containing the current local time.
    ///
    /// # Errors
    ///
    /// See [`aggregate`](Self::aggregate).
    pub fn aggregate_now(&self, kind: PeriodKind) -> Result<Report, ScreenTimeError> {
        self.aggregate(kind, &Local::now())
    }

    /// Aggregate the window of `kind` containing `reference`.
    ///
    /// An empty window is not an error: it yields a report with no apps.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPeriod` if the window cannot be computed and
    /// `StoreUnavailable` if the sessions cannot be read. No partial report
    /// is produced.
    pub fn aggregate<Tz: TimeZone>(
        &self,
        kind: PeriodKind,
        reference: &DateTime<Tz>,
    ) -> Result<Report, ScreenTimeError> {
        let window = PeriodWindow::containing(kind, reference, self.week_start)?;

        let mut sessions = self.store.query(window.start, window.end)?;
        sessions.sort_by(|a, b| {
            a.start_time
                .cmp(&b.start_time)
                .then_with(|| a.application_id.cmp(&b.application_id))
        });

        let mut by_app: BTreeMap<String, (Duration, usize)> = BTreeMap::new();
        for session in &sessions {
            if !window.intersects(session.start_time, session.end_time) {
                continue;
            }
            let entry = by_app
                .entry(session.application_id.clone())
                .or_insert((Duration::zero(), 0));
            entry.0 += window.clip(session.start_time, session.end_time);
            entry.1 += 1;
        }

        let total = by_app
            .values()
            .fold(Duration::zero(), |acc, (duration, _)| acc + *duration);

        let mut apps: Vec<AppUsage> = by_app
            .into_iter()
            .map(|(application_id, (duration, sessions))| AppUsage {
                percentage: percentage_of(duration, total),
                application_id,
                duration,
                sessions,
            })
            .collect();
        apps.sort_by(|a, b| {
            b.duration
                .cmp(&a.duration)
                .then_with(|| a.application_id.cmp(&b.application_id))
        });

        Ok(Report {
            period: kind,
            window_start: window.start,
            window_end: window.end,
            total,
            apps,
        })
    }
}

/// `part` as a percentage of `total`, rounded to two decimals.
#[allow(clippy::cast_precision_loss)]
fn percentage_of(part: Duration, total: Duration) -> f64 {
    let total_ms = total.num_milliseconds();
    if total_ms <= 0 {
        return 0.0;
    }
    let pct = part.num_milliseconds() as f64 / total_ms as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}
