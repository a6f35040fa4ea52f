use std::path::Path;

use crate::cli::args::{HistoryArgs, OutputFormat};
use crate::error::ScreenTimeError;
use crate::output::format_sessions;

use super::open_store;

/// Execute the history command.
///
/// # Errors
///
/// Returns an error if the store cannot be read or output formatting fails.
pub fn history(
    args: &HistoryArgs,
    db: Option<&Path>,
    format: OutputFormat,
) -> Result<String, ScreenTimeError> {
    let store = open_store(db)?;
    let sessions = store.recent(args.limit)?;
    format_sessions(&sessions, format)
}
