use crate::error::{Result, TrackerError};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const APP_DIR_NAME: &str = "project-tracker";
pub const PROJECTS_FILE: &str = "projects.json";
pub const CONFIG_FILE: &str = "config.yaml";
pub const IMAGES_DIR: &str = "images";

pub const DATA_DIR_ENV: &str = "TRACKER_DATA_DIR";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// Resolve the per-user data directory.
///
/// Priority:
/// 1. `explicit` (the `--data-dir` flag or `TRACKER_DATA_DIR`)
/// 2. the platform data directory joined with [`APP_DIR_NAME`]
pub fn resolve_data_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(p) = explicit {
        return Ok(p.to_path_buf());
    }
    dirs::data_dir()
        .map(|d| d.join(APP_DIR_NAME))
        .ok_or(TrackerError::DataDirNotFound)
}

pub fn projects_path(data_dir: &Path) -> PathBuf {
    data_dir.join(PROJECTS_FILE)
}

pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE)
}

/// Directory where images are materialized for reveal-in-folder.
pub fn images_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(IMAGES_DIR)
}
