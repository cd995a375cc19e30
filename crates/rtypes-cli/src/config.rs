//! Storage location.

use std::path::PathBuf;

/// Directory under the home directory that holds RemoteTypes data.
pub const HOME_DIR_NAME: &str = ".remotetypes";

/// Subdirectory holding the collection files.
pub const STORAGE_SUBDIR: &str = "storage";

/// Default storage directory: `~/.remotetypes/storage`, or `./storage` when
/// no home directory is known.
pub fn default_storage_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(HOME_DIR_NAME).join(STORAGE_SUBDIR))
        .unwrap_or_else(|| PathBuf::from(STORAGE_SUBDIR))
}

/// An explicit directory (flag or `RTYPES_STORAGE_DIR`) wins over the default.
pub fn resolve_storage_dir(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(default_storage_dir)
}
