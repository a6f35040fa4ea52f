//! Command implementations for screentime.
//!
//! Each command returns the text to print; `main` does the printing.

mod completions;
mod history;
mod report;
mod track;

use std::path::Path;

pub use completions::{completions, generate_completions};
pub use history::history;
pub use report::report;
pub use track::track;

use crate::error::ScreenTimeError;
use crate::features::tracking::SqliteUsageStore;

/// Open the session store at `db`, or at the default location.
///
/// # Errors
///
/// Returns `ScreenTimeError::StoreUnavailable` if the database cannot be
/// opened, or `ScreenTimeError::Io` if its directory cannot be created.
pub fn open_store(db: Option<&Path>) -> Result<SqliteUsageStore, ScreenTimeError> {
    match db {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            log::debug!("using database {}", path.display());
            SqliteUsageStore::open_at(path)
        }
        None => SqliteUsageStore::new(),
    }
}
