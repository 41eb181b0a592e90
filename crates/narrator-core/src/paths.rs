//! Data directory resolution.

use std::env;
use std::path::PathBuf;

use thiserror::Error;

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "NARRATOR_DATA_DIR";

/// Errors that can occur while resolving paths.
#[derive(Debug, Error)]
pub enum PathError {
    /// Could not determine the system data directory.
    #[error("Cannot determine system data directory")]
    NoDataDir,
}

/// Root directory for persisted data (session blob).
///
/// Resolution order:
/// 1. `NARRATOR_DATA_DIR` environment variable
/// 2. System data directory (e.g., `~/.local/share/manga-narrator`)
pub fn data_root() -> Result<PathBuf, PathError> {
    if let Ok(path) = env::var(DATA_DIR_ENV) {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    let data_dir = dirs::data_local_dir().ok_or(PathError::NoDataDir)?;
    Ok(data_dir.join("manga-narrator"))
}
