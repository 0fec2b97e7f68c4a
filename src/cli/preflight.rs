//! Pre-flight checks before contacting YouTube.
//!
//! Validates that the extraction tool is available before a request would
//! otherwise fail midway.

use crate::error::{FetchError, Result};
use std::process::Command;

/// Check if an external tool is available.
///
/// Both backends resolve metadata through yt-dlp, so it is always checked
/// before the first request.
pub fn check_tool(name: &str) -> Result<()> {
    match Command::new(name).arg("--version").output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(FetchError::ToolFailed(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(FetchError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(FetchError::ToolNotFound(format!("{}: {}", name, e))),
    }
}

/// Installation hint for yt-dlp on the current platform.
pub fn install_hint() -> &'static str {
    if cfg!(target_os = "macos") {
        "Install with: brew install yt-dlp"
    } else if cfg!(target_os = "linux") {
        "Install with: pip install yt-dlp (or your package manager)"
    } else {
        "Install from: https://github.com/yt-dlp/yt-dlp"
    }
}
