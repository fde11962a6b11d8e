//! Runtime path resolution for the CLI.
//!
//! `--db` and `TRACKER_DB_PATH` are merged by clap before reaching here; a
//! blank value falls through to the temp-dir default.

use std::path::{Path, PathBuf};

const DB_FILE_NAME: &str = "tracker.sqlite3";
const LOG_DIR_NAME: &str = "tracker-logs";

pub fn resolve_db_path(explicit: Option<&Path>) -> PathBuf {
    non_blank(explicit).unwrap_or_else(|| std::env::temp_dir().join(DB_FILE_NAME))
}

/// Log directory, made absolute against the working directory when relative.
pub fn resolve_log_dir(explicit: Option<&Path>) -> PathBuf {
    let dir = non_blank(explicit).unwrap_or_else(|| std::env::temp_dir().join(LOG_DIR_NAME));
    if dir.is_absolute() {
        return dir;
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(dir),
        Err(_) => dir,
    }
}

fn non_blank(path: Option<&Path>) -> Option<PathBuf> {
    path.filter(|path| !path.as_os_str().is_empty())
        .map(Path::to_path_buf)
}
