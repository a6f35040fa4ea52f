//! Path resolution for screentime configuration and data files.
//!
//! All screentime data is stored in `~/.screentime/`:
//! - `config.yaml` - Main configuration file
//! - `screentime.db` - SQLite database of usage sessions

use std::path::PathBuf;

use crate::error::ScreenTimeError;

/// Paths to screentime configuration and data files.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.screentime/`
    pub root: PathBuf,
    /// Config file: `~/.screentime/config.yaml`
    pub config_file: PathBuf,
    /// Database file: `~/.screentime/screentime.db`
    pub database: PathBuf,
}

impl Paths {
    /// Create paths based on the user's home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, ScreenTimeError> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map_err(|_| ScreenTimeError::Config("Could not determine home directory".to_string()))?;

        Ok(Self::with_root(PathBuf::from(home).join(".screentime")))
    }

    /// Create paths with a custom root directory (useful for testing).
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            database: root.join("screentime.db"),
            root,
        }
    }

    /// Ensure the data directory exists, creating it if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), ScreenTimeError> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root).map_err(|e| {
                ScreenTimeError::Config(format!(
                    "Failed to create directory {}: {e}",
                    self.root.display()
                ))
            })?;
        }

        Ok(())
    }
}
