//! Native foreground-application probes.
//!
//! Each supported desktop gets one [`ForegroundProbe`] implementation:
//! - X11 via `x11rb` on Linux
//! - System Events via `osascript` on macOS
//! - Win32 foreground window via the `windows` crate on Windows
//!
//! Anything else gets a probe that always reports itself unavailable, so the
//! tracker still runs and records nothing.

use std::sync::Arc;
use std::time::Duration;

use crate::core::ForegroundProbe;
use crate::error::ScreenTimeError;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(any(target_os = "macos", test))]
mod process;
#[cfg(target_os = "windows")]
#[allow(unsafe_code)]
mod windows;

#[cfg(target_os = "linux")]
pub use linux::X11Probe;
#[cfg(target_os = "macos")]
pub use macos::SystemEventsProbe;
#[cfg(target_os = "windows")]
pub use self::windows::ForegroundWindowProbe;

/// Probe used on platforms without a native adapter.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedProbe;

impl ForegroundProbe for UnsupportedProbe {
    fn current_application(&self) -> Result<Option<String>, ScreenTimeError> {
        Err(ScreenTimeError::ProbeUnavailable(format!(
            "no foreground probe for {}",
            std::env::consts::OS
        )))
    }
}

/// The probe for the platform this binary was built for.
///
/// Probes that shell out to a helper kill it once `timeout` has passed.
#[must_use]
#[allow(unused_variables)]
pub fn native_probe(timeout: Duration) -> Arc<dyn ForegroundProbe> {
    #[cfg(target_os = "linux")]
    {
        Arc::new(X11Probe::new())
    }
    #[cfg(target_os = "macos")]
    {
        Arc::new(SystemEventsProbe::new(timeout))
    }
    #[cfg(target_os = "windows")]
    {
        Arc::new(ForegroundWindowProbe)
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        Arc::new(UnsupportedProbe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_probe_is_unavailable() {
        let err = UnsupportedProbe.current_application().unwrap_err();
        assert!(err.is_probe_error());
    }
}
