//! Capability interfaces at the edges of the tracking core.
//!
//! The tracker only ever talks to the operating system through
//! [`ForegroundProbe`] and to persistence through [`UsageStore`], so platform
//! adapters and storage backends can be swapped (or mocked) freely.

use chrono::{DateTime, Utc};

use crate::error::ScreenTimeError;
use crate::features::tracking::Session;

/// Reports which application currently holds input focus.
#[cfg_attr(test, mockall::automock)]
pub trait ForegroundProbe: Send + Sync {
    /// Identifier (name, bundle id or executable) of the focused application.
    ///
    /// Returns `Ok(None)` when nothing identifiable is focused.
    ///
    /// # Errors
    ///
    /// Returns `ScreenTimeError::ProbeUnavailable` when the platform API
    /// cannot be queried.
    fn current_application(&self) -> Result<Option<String>, ScreenTimeError>;
}

/// Durable append/query store for closed sessions.
#[cfg_attr(test, mockall::automock)]
pub trait UsageStore {
    /// Persist a closed session.
    ///
    /// # Errors
    ///
    /// Returns `ScreenTimeError::StoreUnavailable` if the write fails.
    fn append(&self, session: &Session) -> Result<(), ScreenTimeError>;

    /// All sessions whose interval intersects `[start, end)`, in any order.
    ///
    /// # Errors
    ///
    /// Returns `ScreenTimeError::StoreUnavailable` if the read fails.
    fn query(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Session>, ScreenTimeError>;
}
