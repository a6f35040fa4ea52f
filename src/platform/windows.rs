use windows::core::PWSTR;
use windows::Win32::Foundation::CloseHandle;
use windows::Win32::System::Threading::{
    OpenProcess, QueryFullProcessImageNameW, PROCESS_NAME_WIN32, PROCESS_QUERY_LIMITED_INFORMATION,
};
use windows::Win32::UI::WindowsAndMessaging::{GetForegroundWindow, GetWindowThreadProcessId};

use crate::core::ForegroundProbe;
use crate::error::ScreenTimeError;

const PATH_CAPACITY: u32 = 1024;

/// Names the foreground window's process by its executable, e.g.
/// `firefox.exe`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ForegroundWindowProbe;

fn unavailable(e: &windows::core::Error) -> ScreenTimeError {
    ScreenTimeError::ProbeUnavailable(format!("Win32: {e}"))
}

/// Last component of a Windows path.
fn executable_name(path: &str) -> Option<String> {
    path.rsplit(['\\', '/'])
        .next()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

impl ForegroundProbe for ForegroundWindowProbe {
    fn current_application(&self) -> Result<Option<String>, ScreenTimeError> {
        // SAFETY: Win32 queries on handles owned here; every buffer outlives
        // the call that fills it and the process handle is closed once.
        unsafe {
            let hwnd = GetForegroundWindow();
            if hwnd.0.is_null() {
                return Ok(None);
            }

            let mut process_id: u32 = 0;
            GetWindowThreadProcessId(hwnd, Some(std::ptr::addr_of_mut!(process_id)));
            if process_id == 0 {
                return Ok(None);
            }

            let process = OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, process_id)
                .map_err(|e| unavailable(&e))?;

            let mut exe_path = [0u16; PATH_CAPACITY as usize];
            let mut size = PATH_CAPACITY;
            let queried = QueryFullProcessImageNameW(
                process,
                PROCESS_NAME_WIN32,
                PWSTR(exe_path.as_mut_ptr()),
                &mut size,
            );
            let _ = CloseHandle(process);
            queried.map_err(|e| unavailable(&e))?;

            let path = String::from_utf16_lossy(&exe_path[..size as usize]);
            Ok(executable_name(&path))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_executable_name() {
        assert_eq!(
            executable_name(r"C:\Program Files\Mozilla Firefox\firefox.exe"),
            Some("firefox.exe".to_string())
        );
        assert_eq!(executable_name("notepad.exe"), Some("notepad.exe".to_string()));
        assert_eq!(executable_name(r"C:\broken\"), None);
    }

    #[test]
    #[ignore] // Requires an interactive desktop
    fn test_current_application() {
        if let Ok(Some(app)) = ForegroundWindowProbe.current_application() {
            println!("Active: {app}");
        }
    }
}
