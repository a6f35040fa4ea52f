use std::sync::Mutex;

use x11rb::connection::Connection;
use x11rb::protocol::xproto::{AtomEnum, ConnectionExt, Window};
use x11rb::rust_connection::RustConnection;

use crate::core::ForegroundProbe;
use crate::error::ScreenTimeError;

/// Reads the focused application's `WM_CLASS` through the X server.
///
/// The connection is opened on first use and dropped after any error, so a
/// restarted display server is picked up on the next sample.
pub struct X11Probe {
    conn: Mutex<Option<(RustConnection, Window)>>,
}

impl X11Probe {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            conn: Mutex::new(None),
        }
    }
}

impl Default for X11Probe {
    fn default() -> Self {
        Self::new()
    }
}

fn unavailable(e: impl std::fmt::Display) -> ScreenTimeError {
    ScreenTimeError::ProbeUnavailable(format!("X11: {e}"))
}

fn connect() -> Result<(RustConnection, Window), ScreenTimeError> {
    let (conn, screen_num) = x11rb::connect(None).map_err(unavailable)?;
    let root = conn
        .setup()
        .roots
        .get(screen_num)
        .map(|screen| screen.root)
        .ok_or_else(|| unavailable(format!("screen {screen_num} not found")))?;
    Ok((conn, root))
}

fn intern(conn: &RustConnection, name: &str) -> Result<u32, ScreenTimeError> {
    Ok(conn
        .intern_atom(false, name.as_bytes())
        .map_err(unavailable)?
        .reply()
        .map_err(unavailable)?
        .atom)
}

fn active_window(conn: &RustConnection, root: Window) -> Result<Option<Window>, ScreenTimeError> {
    let atom = intern(conn, "_NET_ACTIVE_WINDOW")?;
    let reply = conn
        .get_property(false, root, atom, AtomEnum::WINDOW, 0, 1)
        .map_err(unavailable)?
        .reply()
        .map_err(unavailable)?;

    Ok(reply
        .value32()
        .and_then(|mut values| values.next())
        .filter(|&window| window != 0))
}

/// `WM_CLASS` holds `instance\0class\0`; the class names the application.
fn application_class(raw: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(raw);
    let mut parts = text.split('\0').filter(|part| !part.trim().is_empty());
    let instance = parts.next();
    parts
        .next()
        .or(instance)
        .map(|name| name.trim().to_string())
}

fn focused_class(conn: &RustConnection, root: Window) -> Result<Option<String>, ScreenTimeError> {
    let Some(window) = active_window(conn, root)? else {
        return Ok(None);
    };

    let reply = conn
        .get_property(false, window, AtomEnum::WM_CLASS, AtomEnum::STRING, 0, 1024)
        .map_err(unavailable)?
        .reply()
        .map_err(unavailable)?;

    Ok(application_class(&reply.value))
}

impl ForegroundProbe for X11Probe {
    fn current_application(&self) -> Result<Option<String>, ScreenTimeError> {
        let mut guard = self
            .conn
            .lock()
            .map_err(|_| unavailable("connection lock poisoned"))?;

        if guard.is_none() {
            *guard = Some(connect()?);
            log::debug!("connected to X server");
        }

        let result = match guard.as_ref() {
            Some((conn, root)) => focused_class(conn, *root),
            None => Err(unavailable("not connected")),
        };

        if result.is_err() {
            *guard = None;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_class_prefers_class() {
        assert_eq!(
            application_class(b"navigator\0Firefox\0"),
            Some("Firefox".to_string())
        );
    }

    #[test]
    fn test_application_class_falls_back_to_instance() {
        assert_eq!(application_class(b"xterm\0"), Some("xterm".to_string()));
        assert_eq!(application_class(b""), None);
    }

    #[test]
    #[ignore] // Requires X11 display
    fn test_current_application() {
        let probe = X11Probe::new();
        if let Ok(Some(app)) = probe.current_application() {
            println!("Active: {app}");
        }
    }
}
