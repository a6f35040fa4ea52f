//! Error types for screentime.

use thiserror::Error;

/// Errors that can occur while tracking or reporting.
#[derive(Debug, Error)]
pub enum ScreenTimeError {
    /// The foreground application could not be read (permission denied,
    /// display unavailable, probe timed out, ...).
    #[error("Foreground probe unavailable: {0}")]
    ProbeUnavailable(String),

    /// The usage store rejected a read or write.
    #[error("Usage store unavailable: {0}")]
    StoreUnavailable(String),

    /// An unrecognized report period was requested.
    #[error("Invalid period '{0}' (expected daily, weekly or monthly)")]
    InvalidPeriod(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input could not be parsed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ScreenTimeError {
    /// Build a probe error from the stderr of a failed helper process.
    #[must_use]
    pub fn from_stderr(stderr: &str) -> Self {
        let trimmed = stderr.trim();
        if trimmed.contains("-1743") || trimmed.to_lowercase().contains("not authorized") {
            Self::ProbeUnavailable(format!("permission denied: {trimmed}"))
        } else {
            Self::ProbeUnavailable(trimmed.to_string())
        }
    }

    /// Whether this error came from the foreground probe.
    #[must_use]
    pub const fn is_probe_error(&self) -> bool {
        matches!(self, Self::ProbeUnavailable(_))
    }
}

impl From<rusqlite::Error> for ScreenTimeError {
    fn from(e: rusqlite::Error) -> Self {
        Self::StoreUnavailable(e.to_string())
    }
}
