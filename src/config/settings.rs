//! Configuration settings for screentime.
//!
//! Settings are loaded from `~/.screentime/config.yaml`.

use std::time::Duration;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::cli::args::OutputFormat;
use crate::config::Paths;
use crate::core::{parse_week_start, PeriodKind};
use crate::error::ScreenTimeError;
use crate::features::tracking::TrackerConfig;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
    /// Tracker settings.
    pub tracker: TrackerSettings,
    /// Report settings.
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default output format.
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
}

/// Tracker settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerSettings {
    /// Seconds between foreground samples.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Milliseconds a single probe call may take.
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_ms: u64,
    /// Consecutive failed samples tolerated before focus counts as lost.
    #[serde(default = "default_max_probe_failures")]
    pub max_probe_failures: u32,
}

/// Report settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// First day of a reporting week (e.g. `monday`, `sunday`).
    #[serde(default = "default_week_start")]
    pub week_start: String,
    /// Period used when `report` is run without `--period`.
    #[serde(default = "default_period")]
    pub default_period: PeriodKind,
}

// Default value functions for serde
const fn default_output_format() -> OutputFormat {
    OutputFormat::Pretty
}

const fn default_poll_interval() -> u64 {
    5
}

const fn default_probe_timeout() -> u64 {
    2000
}

const fn default_max_probe_failures() -> u32 {
    1
}

fn default_week_start() -> String {
    "monday".to_string()
}

const fn default_period() -> PeriodKind {
    PeriodKind::Daily
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: default_output_format(),
        }
    }
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            probe_timeout_ms: default_probe_timeout(),
            max_probe_failures: default_max_probe_failures(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            week_start: default_week_start(),
            default_period: default_period(),
        }
    }
}

impl TrackerSettings {
    /// Tracker configuration, with zero values replaced by defaults.
    #[must_use]
    pub fn tracker_config(&self) -> TrackerConfig {
        let defaults = TrackerConfig::default();
        TrackerConfig {
            poll_interval: match self.poll_interval_secs {
                0 => defaults.poll_interval,
                secs => Duration::from_secs(secs),
            },
            probe_timeout: match self.probe_timeout_ms {
                0 => defaults.probe_timeout,
                ms => Duration::from_millis(ms),
            },
            max_probe_failures: self.max_probe_failures,
        }
    }
}

impl ReportConfig {
    /// Configured first day of the week.
    ///
    /// # Errors
    ///
    /// Returns `ScreenTimeError::Config` if `week_start` is not a weekday.
    pub fn week_start(&self) -> Result<Weekday, ScreenTimeError> {
        parse_week_start(&self.week_start)
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self, ScreenTimeError> {
        let paths = Paths::new()?;
        Self::load_from_path(&paths.config_file)
    }

    /// Load configuration from a specific path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, ScreenTimeError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            ScreenTimeError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            ScreenTimeError::Config(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }
}
