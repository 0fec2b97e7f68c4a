//! Output directory checks.

use crate::error::{FetchError, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Validates that `path` can be used as the output directory.
///
/// An existing non-directory is rejected. Otherwise the directory itself (or,
/// when it does not exist yet, its parent) must be writable by the current
/// user. Nothing is created here.
#[instrument]
pub fn validate_save_path(path: &Path) -> Result<()> {
    let check_err = |source: std::io::Error| FetchError::SavePathCheck {
        path: path.to_path_buf(),
        source,
    };

    let exists = path.try_exists().map_err(check_err)?;

    if exists && !path.is_dir() {
        return Err(FetchError::SavePathNotDirectory(path.to_path_buf()));
    }

    let probe_dir = if exists {
        path.to_path_buf()
    } else {
        let absolute = std::path::absolute(path).map_err(check_err)?;
        absolute
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("/"))
    };

    if !is_writable(&probe_dir) {
        return Err(FetchError::SavePathNotWritable(probe_dir));
    }

    debug!("Save path is writable via {}", probe_dir.display());
    Ok(())
}

/// Creates the output directory (and any missing parents).
///
/// Returns `true` if the directory had to be created.
pub fn ensure_output_dir(path: &Path) -> Result<bool> {
    if path.is_dir() {
        return Ok(false);
    }

    info!("Creating directory {}", path.display());

    std::fs::create_dir_all(path).map_err(|source| FetchError::DirectoryCreation {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(true)
}

/// Checks write access by creating a throwaway file in `dir`.
fn is_writable(dir: &Path) -> bool {
    if !dir.is_dir() {
        return false;
    }

    match tempfile::Builder::new()
        .prefix(".ytm4a-probe")
        .tempfile_in(dir)
    {
        Ok(_) => true,
        Err(e) => {
            if e.kind() != ErrorKind::PermissionDenied {
                debug!("Write probe in {} failed: {}", dir.display(), e);
            }
            false
        }
    }
}
