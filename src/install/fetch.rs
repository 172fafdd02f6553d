//! File download and archive extraction for the installer.
//!
//! Downloads go through `ureq`; extraction shells out to `unzip` via the
//! injected [`Executor`] so it can be exercised in tests without archives.

use std::io::Read as _;
use std::path::Path;

use crate::error::InstallError;
use crate::exec::Executor;

/// Download `url` to `dest`, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if the request fails or the file cannot be written.
pub fn download(url: &str, dest: &Path) -> Result<(), InstallError> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent).map_err(|e| InstallError::Io {
            action: "creating directory",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let mut response = ureq::get(url).call().map_err(|e| InstallError::Download {
        url: url.to_string(),
        source: Box::new(e),
    })?;
    let mut bytes = Vec::new();
    response
        .body_mut()
        .as_reader()
        .read_to_end(&mut bytes)
        .map_err(|e| InstallError::Download {
            url: url.to_string(),
            source: Box::new(e),
        })?;

    std::fs::write(dest, bytes).map_err(|e| InstallError::Io {
        action: "writing",
        path: dest.to_path_buf(),
        source: e,
    })
}

/// Extract a zip archive into `dest` (created if missing), overwriting
/// existing entries.
///
/// # Errors
///
/// Returns an error if `unzip` cannot be spawned or exits non-zero.
pub fn extract_zip(executor: &dyn Executor, archive: &Path, dest: &Path) -> Result<(), InstallError> {
    std::fs::create_dir_all(dest).map_err(|e| InstallError::Io {
        action: "creating directory",
        path: dest.to_path_buf(),
        source: e,
    })?;

    let archive_arg = archive.to_string_lossy();
    let dest_arg = dest.to_string_lossy();
    let action = || format!("extracting {}", archive.display());

    let result = executor
        .run("unzip", &["-o", "-q", &archive_arg, "-d", &dest_arg])
        .map_err(|e| InstallError::CommandFailed {
            action: action(),
            detail: e.to_string(),
        })?;
    if result.success {
        Ok(())
    } else {
        Err(InstallError::CommandFailed {
            action: action(),
            detail: result.detail(),
        })
    }
}
