//! Normalizes downloaded files to the `.m4a` extension.

use crate::cli::{Confirm, Output};
use crate::error::{FetchError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Extension every saved file ends up with.
pub const FINAL_EXTENSION: &str = "m4a";

/// Question asked before an existing file is replaced.
pub const OVERWRITE_QUESTION: &str = "Do you want to overwrite it? (y/N)";

/// Result of finalizing a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finalized {
    /// File is in place at this absolute path.
    Saved(PathBuf),
    /// The user refused to overwrite an existing file; nothing was touched.
    Declined,
}

/// Path the file at `path` ends up at once its extension is normalized.
pub fn target_path(path: &Path) -> PathBuf {
    path.with_extension(FINAL_EXTENSION)
}

/// Ask before replacing `existing`, removing it on agreement.
///
/// Returns `Ok(false)` if the user declined.
pub fn confirm_overwrite(existing: &Path, confirm: &mut dyn Confirm) -> Result<bool> {
    let name = existing
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| existing.display().to_string());

    Output::warning(&format!("File '{}' already exists.", name));

    if !confirm.confirm(OVERWRITE_QUESTION)? {
        return Ok(false);
    }

    info!("Removing existing {}", existing.display());
    std::fs::remove_file(existing)?;
    Ok(true)
}

/// Rename `downloaded` so that it carries the `.m4a` extension.
///
/// Running it on a file that is already named correctly is a no-op.
#[instrument(skip(confirm))]
pub fn finalize(downloaded: &Path, confirm: &mut dyn Confirm) -> Result<Finalized> {
    if downloaded.as_os_str().is_empty() || downloaded.file_name().is_none() {
        return Err(FetchError::InvalidDownloadPath(
            downloaded.display().to_string(),
        ));
    }

    if !downloaded.is_file() {
        return Err(FetchError::InvalidDownloadPath(format!(
            "{} does not exist",
            downloaded.display()
        )));
    }

    let final_path = target_path(downloaded);

    if final_path.as_path() != downloaded {
        if final_path.exists() && !confirm_overwrite(&final_path, confirm)? {
            return Ok(Finalized::Declined);
        }

        debug!("Renaming {} to {}", downloaded.display(), final_path.display());

        std::fs::rename(downloaded, &final_path).map_err(|source| FetchError::Rename {
            from: downloaded.to_path_buf(),
            to: final_path.clone(),
            source,
        })?;
    }

    Ok(Finalized::Saved(std::path::absolute(&final_path)?))
}
