//! Usage sessions and the tracker's in-memory state.

use chrono::{DateTime, Duration, Local, Utc};
use serde::{Deserialize, Serialize};

/// One contiguous interval during which a single application held focus.
///
/// Sessions are only created closed; once persisted they are never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Database ID (None if not persisted)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Focused application identifier
    pub application_id: String,
    /// When the application gained focus
    pub start_time: DateTime<Utc>,
    /// When the application lost focus (or tracking stopped)
    pub end_time: DateTime<Utc>,
}

impl Session {
    /// Create a closed session.
    ///
    /// `end_time` is clamped so it never precedes `start_time`.
    #[must_use]
    pub fn new(
        application_id: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            application_id: application_id.into(),
            start_time,
            end_time: end_time.max(start_time),
        }
    }

    /// Time spent in this session.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    /// Get start time in local timezone.
    #[must_use]
    pub fn start_time_local(&self) -> DateTime<Local> {
        self.start_time.with_timezone(&Local)
    }

    /// Get end time in local timezone.
    #[must_use]
    pub fn end_time_local(&self) -> DateTime<Local> {
        self.end_time.with_timezone(&Local)
    }
}

/// One reading of the foreground probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sample {
    /// An identifiable application is focused.
    Focused(String),
    /// Nothing identifiable is focused.
    Nothing,
    /// The probe failed or timed out.
    Unavailable,
}

impl Sample {
    /// Normalize a probe result: blank identifiers count as nothing focused.
    #[must_use]
    pub fn from_probe(app: Option<String>) -> Self {
        match app {
            Some(name) if !name.trim().is_empty() => Self::Focused(name.trim().to_string()),
            _ => Self::Nothing,
        }
    }
}

/// The application believed to be focused right now and since when.
#[derive(Debug, Clone, PartialEq, Eq)]
struct OpenSession {
    application_id: String,
    started_at: DateTime<Utc>,
}

/// Tracker state: either idle or holding one open session.
///
/// The current application and the session start are stored together, so
/// one can never be set without the other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackingState {
    open: Option<OpenSession>,
}

impl TrackingState {
    /// Application currently believed to be focused.
    #[must_use]
    pub fn current_application(&self) -> Option<&str> {
        self.open.as_ref().map(|s| s.application_id.as_str())
    }

    /// When the current application became focused.
    #[must_use]
    pub fn current_session_start(&self) -> Option<DateTime<Utc>> {
        self.open.as_ref().map(|s| s.started_at)
    }

    /// Whether no session is open.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        self.open.is_none()
    }

    /// Begin a session for `application_id` at `at`.
    pub(crate) fn begin(&mut self, application_id: String, at: DateTime<Utc>) {
        self.open = Some(OpenSession {
            application_id,
            started_at: at,
        });
    }

    /// Close the open session (if any) at `at`.
    pub(crate) fn close(&mut self, at: DateTime<Utc>) -> Option<Session> {
        self.open
            .take()
            .map(|open| Session::new(open.application_id, open.started_at, at))
    }
}
