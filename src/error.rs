//! Error types for ytm4a.

use std::path::PathBuf;
use thiserror::Error;

/// Library-level error type for ytm4a operations.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid YouTube URL: '{0}'")]
    InvalidUrlFormat(String),

    #[error("'{}' exists but is not a directory.", .0.display())]
    SavePathNotDirectory(PathBuf),

    #[error("No write permission for directory '{}'.", .0.display())]
    SavePathNotWritable(PathBuf),

    #[error("Error validating save path '{}': {source}", path.display())]
    SavePathCheck {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot create directory '{}': {source}", path.display())]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YouTube URL (rejected by extractor): {0}")]
    ExtractionRegexMismatch(String),

    #[error("The video is unavailable. It may be private, deleted, or region-restricted.")]
    VideoUnavailable(String),

    #[error("This video is age-restricted and cannot be downloaded.")]
    AgeRestricted(String),

    #[error("Live streams cannot be downloaded.")]
    LiveStreamUnsupported(String),

    #[error("Network connection issue: {0}")]
    Network(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Downloaded file path is not valid: {0}")]
    InvalidDownloadPath(String),

    #[error("Cannot rename '{}' to '{}': {source}", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("External tool failed: {0}")]
    ToolFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl FetchError {
    /// Remediation text shown under the error, if any.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            FetchError::InvalidUrlFormat(_) | FetchError::ExtractionRegexMismatch(_) => {
                Some("Please provide a valid YouTube video URL.")
            }
            FetchError::DirectoryCreation { source, .. }
                if source.kind() == std::io::ErrorKind::PermissionDenied =>
            {
                Some("Please check your permissions or choose a different directory.")
            }
            FetchError::Network(_) => {
                Some("Please check your internet connection and try again.")
            }
            FetchError::ExtractionFailed(_) => Some(
                "This could be due to a network issue or a change in the YouTube platform. \
                 Try updating yt-dlp with: yt-dlp -U",
            ),
            FetchError::Rename { source, .. }
                if source.kind() == std::io::ErrorKind::PermissionDenied =>
            {
                Some("Please check your permissions for the output directory.")
            }
            FetchError::Rename { .. } => {
                Some("This could be due to insufficient disk space or invalid file names.")
            }
            FetchError::ToolNotFound(_) => Some(crate::cli::preflight::install_hint()),
            FetchError::Io(_)
            | FetchError::Json(_)
            | FetchError::TomlParse(_)
            | FetchError::Http(_)
            | FetchError::ToolFailed(_)
            | FetchError::InvalidDownloadPath(_) => {
                Some("Please try again or report this issue if it persists.")
            }
            _ => None,
        }
    }

    /// Process exit status for this error. Every failure is fatal.
    pub fn exit_code(&self) -> u8 {
        1
    }
}

/// Result type alias for ytm4a operations.
pub type Result<T> = std::result::Result<T, FetchError>;
