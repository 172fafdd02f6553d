//! Filesystem helpers shared by the synchronizer: tracked-file discovery,
//! metadata-preserving copies, and timestamped backup directories.

use std::path::{Path, PathBuf};

use filetime::FileTime;

use crate::error::SyncError;

/// Collect every regular file under `root`, as paths relative to `root`,
/// sorted for deterministic run order.
///
/// Symlinked directories are followed (matching [`Path::is_dir`] semantics).
///
/// # Errors
///
/// Returns an error if a directory cannot be read.
pub fn collect_relative_files(root: &Path) -> Result<Vec<PathBuf>, SyncError> {
    let mut files = Vec::new();
    walk(root, root, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk(root: &Path, dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), SyncError> {
    let entries =
        std::fs::read_dir(dir).map_err(|e| SyncError::io("reading directory", dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| SyncError::io("reading directory", dir, e))?;
        let path = entry.path();
        if path.is_dir() {
            walk(root, &path, out)?;
        } else if path.is_file() {
            // Strip the root prefix; entries always live under it.
            if let Ok(rel) = path.strip_prefix(root) {
                out.push(rel.to_path_buf());
            }
        }
    }
    Ok(())
}

/// Copy `src` to `dst` byte-for-byte, creating parent directories and
/// carrying over the source's modification time.
///
/// # Errors
///
/// Returns an error if the copy or the metadata transfer fails.
pub fn copy_preserving(src: &Path, dst: &Path) -> Result<(), SyncError> {
    if let Some(parent) = dst.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| SyncError::io("creating directory", parent, e))?;
    }
    std::fs::copy(src, dst).map_err(|e| SyncError::io("copying", src, e))?;

    let metadata = std::fs::metadata(src).map_err(|e| SyncError::io("reading metadata", src, e))?;
    let mtime = FileTime::from_last_modification_time(&metadata);
    filetime::set_file_mtime(dst, mtime).map_err(|e| SyncError::io("setting mtime", dst, e))?;
    Ok(())
}

/// Current local time as a `YYYYMMDD_HHMMSS` backup-directory stamp.
#[must_use]
pub fn timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}
