//! Session tracker state machine.
//!
//! Turns point-in-time foreground samples into closed [`Session`]s:
//! consecutive identical samples coalesce, a switch closes the open session
//! and starts the next one, and "nothing focused" closes without starting.
//! Closed sessions queue up until the store accepts them, so a failing store
//! never loses data.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use serde::Serialize;

use super::session::{Sample, Session, TrackingState};
use crate::core::{ForegroundProbe, UsageStore};
use crate::error::ScreenTimeError;

/// Tunables for a tracking run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Time between probe samples.
    pub poll_interval: StdDuration,
    /// Upper bound on a single probe call.
    pub probe_timeout: StdDuration,
    /// Consecutive failed samples tolerated before focus counts as lost.
    pub max_probe_failures: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            poll_interval: StdDuration::from_secs(5),
            probe_timeout: StdDuration::from_secs(2),
            max_probe_failures: 1,
        }
    }
}

/// Counters for a tracking run, returned when tracking stops.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrackingSummary {
    /// Sessions closed (switches, focus loss and the shutdown flush)
    pub sessions_closed: u64,
    /// Sessions accepted by the store
    pub sessions_persisted: u64,
    /// Samples where the probe failed or timed out
    pub probe_failures: u64,
    /// Rejected store writes (each retry counts)
    pub store_failures: u64,
    /// Sessions the store still had not accepted when tracking stopped
    pub unsaved: Vec<Session>,
}

/// Polls a [`ForegroundProbe`] and writes closed sessions to a [`UsageStore`].
pub struct SessionTracker<S: UsageStore> {
    pub(super) probe: Arc<dyn ForegroundProbe>,
    store: S,
    pub(super) config: TrackerConfig,
    state: TrackingState,
    pending: VecDeque<Session>,
    failure_streak: u32,
    first_failure_at: Option<DateTime<Utc>>,
    summary: TrackingSummary,
}

impl<S: UsageStore> SessionTracker<S> {
    /// Create a tracker with empty state.
    #[must_use]
    pub fn new(probe: Arc<dyn ForegroundProbe>, store: S, config: TrackerConfig) -> Self {
        Self {
            probe,
            store,
            config,
            state: TrackingState::default(),
            pending: VecDeque::new(),
            failure_streak: 0,
            first_failure_at: None,
            summary: TrackingSummary::default(),
        }
    }

    /// Current tracking state.
    #[must_use]
    pub const fn state(&self) -> &TrackingState {
        &self.state
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Closed sessions waiting for the store, oldest first.
    #[must_use]
    pub const fn pending(&self) -> &VecDeque<Session> {
        &self.pending
    }

    /// Counters so far.
    #[must_use]
    pub const fn summary(&self) -> &TrackingSummary {
        &self.summary
    }

    /// Sample the probe once, now.
    ///
    /// Returns the session closed by this sample, if any.
    ///
    /// # Errors
    ///
    /// Returns `ProbeUnavailable` if the probe failed (the sample counts as
    /// "nothing focused", subject to the failure tolerance) or
    /// `StoreUnavailable` if the write failed (the session stays queued).
    /// Tracking state is consistent either way.
    pub fn poll_once(&mut self) -> Result<Option<Session>, ScreenTimeError> {
        self.poll_at(Utc::now())
    }

    /// Sample the probe once, stamping the sample with `now`.
    ///
    /// # Errors
    ///
    /// See [`poll_once`](Self::poll_once).
    pub fn poll_at(&mut self, now: DateTime<Utc>) -> Result<Option<Session>, ScreenTimeError> {
        match self.probe.current_application() {
            Ok(app) => self.apply(Sample::from_probe(app), None, now),
            Err(e) => self.apply(Sample::Unavailable, Some(e), now),
        }
    }

    /// Feed a sample taken elsewhere (e.g. under a timeout) into the tracker.
    pub(super) fn apply(
        &mut self,
        sample: Sample,
        probe_error: Option<ScreenTimeError>,
        now: DateTime<Utc>,
    ) -> Result<Option<Session>, ScreenTimeError> {
        debug!("sample: {sample:?}");
        if let Some(e) = &probe_error {
            if self.failure_streak == 0 {
                warn!("foreground probe failed: {e}");
            } else {
                debug!("foreground probe still failing ({}): {e}", self.failure_streak + 1);
            }
        }

        let closed = self.observe(sample, now);
        let write = self.persist_next();

        if let Some(e) = probe_error {
            return Err(e);
        }
        write?;
        Ok(closed)
    }

    /// Advance the state machine with one sample.
    ///
    /// Never touches the store; a closed session is queued and returned.
    pub fn observe(&mut self, sample: Sample, now: DateTime<Utc>) -> Option<Session> {
        let closed = match sample {
            Sample::Unavailable => {
                self.summary.probe_failures += 1;
                self.failure_streak += 1;
                let lost_at = *self.first_failure_at.get_or_insert(now);

                if self.failure_streak > self.config.max_probe_failures {
                    self.state.close(lost_at)
                } else {
                    None
                }
            }
            Sample::Nothing => {
                self.reset_failures();
                self.state.close(now)
            }
            Sample::Focused(app) => {
                self.reset_failures();
                if self.state.current_application() == Some(app.as_str()) {
                    None
                } else {
                    let closed = self.state.close(now);
                    info!("now tracking: {app}");
                    self.state.begin(app, now);
                    closed
                }
            }
        };

        if let Some(session) = &closed {
            info!(
                "closed session: {} ({}s)",
                session.application_id,
                session.duration().num_seconds()
            );
            self.summary.sessions_closed += 1;
            self.pending.push_back(session.clone());
        }

        closed
    }

    /// Close any open session at `now` and flush everything queued.
    ///
    /// Sessions the store still refuses are returned in
    /// [`TrackingSummary::unsaved`] and stay queued.
    pub fn stop_at(&mut self, now: DateTime<Utc>) -> TrackingSummary {
        if let Some(session) = self.state.close(now) {
            info!(
                "saved final session: {} ({}s)",
                session.application_id,
                session.duration().num_seconds()
            );
            self.summary.sessions_closed += 1;
            self.pending.push_back(session);
        }
        self.reset_failures();

        let _ = self.flush_pending();

        for session in &self.pending {
            error!(
                "session not saved: {} {} - {}",
                session.application_id,
                session.start_time.to_rfc3339(),
                session.end_time.to_rfc3339()
            );
        }

        let mut summary = self.summary.clone();
        summary.unsaved = self.pending.iter().cloned().collect();
        summary
    }

    /// Stop tracking now. See [`stop_at`](Self::stop_at).
    pub fn stop(&mut self) -> TrackingSummary {
        self.stop_at(Utc::now())
    }

    /// Write queued sessions oldest first until the queue is empty or a
    /// write fails.
    fn flush_pending(&mut self) -> Result<(), ScreenTimeError> {
        while !self.pending.is_empty() {
            self.persist_next()?;
        }
        Ok(())
    }

    /// Try to write the oldest queued session.
    fn persist_next(&mut self) -> Result<(), ScreenTimeError> {
        let Some(session) = self.pending.front() else {
            return Ok(());
        };

        match self.store.append(session) {
            Ok(()) => {
                self.pending.pop_front();
                self.summary.sessions_persisted += 1;
                Ok(())
            }
            Err(e) => {
                error!(
                    "failed to save session for {} ({} queued): {e}",
                    session.application_id,
                    self.pending.len()
                );
                self.summary.store_failures += 1;
                Err(e)
            }
        }
    }

    fn reset_failures(&mut self) {
        self.failure_streak = 0;
        self.first_failure_at = None;
    }
}
