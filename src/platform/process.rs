use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};

use crate::error::ScreenTimeError;

/// How often a running helper is checked for exit.
const WAIT_STEP: Duration = Duration::from_millis(10);

/// Run `cmd` to completion, killing it if it is still running after
/// `timeout`.
pub fn output_within(cmd: &mut Command, timeout: Duration) -> Result<Output, ScreenTimeError> {
    let program = cmd.get_program().to_string_lossy().into_owned();
    let failed = |e: std::io::Error| ScreenTimeError::ProbeUnavailable(format!("{program}: {e}"));

    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(failed)?;

    let deadline = Instant::now() + timeout;
    while child.try_wait().map_err(failed)?.is_none() {
        if Instant::now() >= deadline {
            if let Err(e) = child.kill() {
                log::warn!("failed to kill {program}: {e}");
            }
            let _ = child.wait();
            return Err(ScreenTimeError::ProbeUnavailable(format!(
                "{program} did not finish within {timeout:?}"
            )));
        }
        std::thread::sleep(WAIT_STEP);
    }

    child.wait_with_output().map_err(failed)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_output_within_returns_output() {
        let output = output_within(
            Command::new("sh").args(["-c", "echo Terminal"]),
            Duration::from_secs(5),
        )
        .unwrap();

        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "Terminal");
    }

    #[test]
    fn test_output_within_kills_hung_helper() {
        let started = Instant::now();
        let err = output_within(Command::new("sleep").arg("5"), Duration::from_millis(100))
            .unwrap_err();

        assert!(err.is_probe_error());
        assert!(err.to_string().contains("did not finish"));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_output_within_missing_program() {
        let err = output_within(
            &mut Command::new("screentime-no-such-helper"),
            Duration::from_secs(1),
        )
        .unwrap_err();
        assert!(err.is_probe_error());
    }
}
