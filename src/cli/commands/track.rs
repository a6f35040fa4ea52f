use std::path::Path;

use colored::Colorize;
use log::{info, warn};
use tokio_util::sync::CancellationToken;

use crate::cli::args::{OutputFormat, TrackArgs};
use crate::config::Config;
use crate::core::parse_interval;
use crate::error::ScreenTimeError;
use crate::features::tracking::{SessionTracker, TrackerConfig};
use crate::output::format_summary;
use crate::platform::native_probe;

use super::open_store;

/// Resolve tracker settings from the config file and command-line overrides.
fn tracker_config(args: &TrackArgs, config: &Config) -> Result<TrackerConfig, ScreenTimeError> {
    let mut tracker_config = config.tracker.tracker_config();
    if let Some(interval) = &args.interval {
        tracker_config.poll_interval = parse_interval(interval).ok_or_else(|| {
            ScreenTimeError::InvalidInput(format!(
                "Invalid interval '{interval}' (examples: 5, 5s, 1m, 500ms)"
            ))
        })?;
    }
    Ok(tracker_config)
}

/// Resolves once the process is asked to stop.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    result = tokio::signal::ctrl_c() => {
                        if let Err(e) = result {
                            warn!("failed to listen for Ctrl-C: {e}");
                        }
                    }
                    _ = terminate.recv() => {}
                }
                return;
            }
            Err(e) => warn!("failed to listen for SIGTERM: {e}"),
        }
    }

    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}

/// Execute the track command.
///
/// Blocks until interrupted, then prints the run's summary.
///
/// # Errors
///
/// Returns an error if the interval is malformed, the store cannot be
/// opened, or the async runtime cannot start. Probe and store failures
/// during the run are counted in the summary instead.
pub fn track(
    args: &TrackArgs,
    config: &Config,
    db: Option<&Path>,
    format: OutputFormat,
) -> Result<String, ScreenTimeError> {
    let tracker_config = tracker_config(args, config)?;
    let store = open_store(db)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    eprintln!(
        "{} (every {:?}, Ctrl-C to stop)",
        "Tracking foreground application".bold(),
        tracker_config.poll_interval
    );

    let summary = runtime.block_on(async move {
        let cancel = CancellationToken::new();
        let stop = cancel.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            info!("interrupt received");
            stop.cancel();
        });

        let probe = native_probe(tracker_config.probe_timeout);
        let mut tracker = SessionTracker::new(probe, store, tracker_config);
        tracker.run(tracker_config.poll_interval, cancel).await
    });
    // Don't wait on a probe call that never returned
    runtime.shutdown_timeout(tracker_config.probe_timeout);

    format_summary(&summary, format)
}
