//! Cancellable polling loop.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Utc;
use log::{debug, info, warn};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::session::Sample;
use super::tracker::{SessionTracker, TrackingSummary};
use crate::core::{ForegroundProbe, UsageStore};
use crate::error::ScreenTimeError;

type ProbeCall = JoinHandle<Result<Option<String>, ScreenTimeError>>;

impl<S: UsageStore> SessionTracker<S> {
    /// Poll every `poll_interval` until `cancel` fires, then flush.
    ///
    /// Ticks never overlap: a slow probe delays the next tick instead of
    /// bunching them up. Each probe call runs on the blocking pool and is
    /// abandoned after the configured probe timeout; at most one call is
    /// ever outstanding. Cancellation is observed while waiting for a tick
    /// and while waiting for the probe. Failed samples and writes are
    /// logged and never end the loop.
    pub async fn run(
        &mut self,
        poll_interval: StdDuration,
        cancel: CancellationToken,
    ) -> TrackingSummary {
        let mut ticker = tokio::time::interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut in_flight: Option<ProbeCall> = None;
        info!("tracking started (polling every {poll_interval:?})");

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    info!("stop requested, flushing open session");
                    break;
                }
                _ = ticker.tick() => {}
            }

            let Some((sample, probe_error)) =
                sample_probe(&self.probe, &mut in_flight, self.config.probe_timeout, &cancel).await
            else {
                info!("stop requested while sampling, flushing open session");
                break;
            };
            if let Err(e) = self.apply(sample, probe_error, Utc::now()) {
                debug!("tick finished with error: {e}");
            }
        }

        if in_flight.is_some_and(|call| !call.is_finished()) {
            warn!("abandoning a probe call that has not returned");
        }
        self.stop()
    }
}

/// Read the probe off the async thread, bounded by `timeout`.
///
/// A call that outlives its timeout stays in `in_flight`. Until it returns,
/// samples are unavailable and no second call is started; once it returns
/// its stale result is dropped. Returns `None` if `cancel` fires first.
async fn sample_probe(
    probe: &Arc<dyn ForegroundProbe>,
    in_flight: &mut Option<ProbeCall>,
    timeout: StdDuration,
    cancel: &CancellationToken,
) -> Option<(Sample, Option<ScreenTimeError>)> {
    if in_flight.as_ref().is_some_and(|call| !call.is_finished()) {
        return Some((
            Sample::Unavailable,
            Some(ScreenTimeError::ProbeUnavailable(
                "previous probe call still running".to_string(),
            )),
        ));
    }

    let probe = Arc::clone(probe);
    let call = in_flight.insert(tokio::task::spawn_blocking(move || probe.current_application()));

    let outcome = tokio::select! {
        biased;
        () = cancel.cancelled() => return None,
        outcome = tokio::time::timeout(timeout, call) => outcome,
    };

    let Ok(joined) = outcome else {
        return Some((
            Sample::Unavailable,
            Some(ScreenTimeError::ProbeUnavailable(format!(
                "probe timed out after {timeout:?}"
            ))),
        ));
    };
    *in_flight = None;

    Some(match joined {
        Ok(Ok(app)) => (Sample::from_probe(app), None),
        Ok(Err(e)) => (Sample::Unavailable, Some(e)),
        Err(join_err) => (
            Sample::Unavailable,
            Some(ScreenTimeError::ProbeUnavailable(format!(
                "probe task failed: {join_err}"
            ))),
        ),
    })
}
