use std::process::Command;
use std::time::Duration;

use super::process::output_within;
use crate::core::ForegroundProbe;
use crate::error::ScreenTimeError;

const FRONTMOST_SCRIPT: &str = r"(() => {
    const se = Application('System Events');
    const procs = se.processes.whose({ frontmost: true })();
    return procs.length > 0 ? procs[0].name() : '';
})()";

/// Asks System Events for the frontmost process.
///
/// macOS gates this behind the Automation permission; a refusal surfaces as
/// a probe error. An `osascript` that hangs is killed after `timeout`.
#[derive(Debug, Clone, Copy)]
pub struct SystemEventsProbe {
    timeout: Duration,
}

impl SystemEventsProbe {
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl ForegroundProbe for SystemEventsProbe {
    fn current_application(&self) -> Result<Option<String>, ScreenTimeError> {
        let output = output_within(
            Command::new("osascript")
                .arg("-l")
                .arg("JavaScript")
                .arg("-e")
                .arg(FRONTMOST_SCRIPT),
            self.timeout,
        )?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ScreenTimeError::from_stderr(&stderr));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let name = stdout.trim();
        if name.is_empty() {
            Ok(None)
        } else {
            Ok(Some(name.to_string()))
        }
    }
}
