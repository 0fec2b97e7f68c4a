//! Maps extractor failures onto [`FetchError`] kinds.
//!
//! Typed signals (I/O error kinds, HTTP status codes, reqwest error flags) are
//! used whenever they exist. Text matching on the tool's stderr is the last
//! resort, so the raw message is always logged for diagnosis.

use crate::error::FetchError;
use tracing::debug;

const REGEX_MISMATCH: &[&str] = &["unsupported url", "is not a valid url"];

const UNAVAILABLE: &[&str] = &[
    "video unavailable",
    "private video",
    "has been removed",
    "not available in your country",
];

const AGE_RESTRICTED: &[&str] = &[
    "age-restricted",
    "age restricted",
    "confirm your age",
    "inappropriate for some users",
];

const LIVE: &[&str] = &["live stream", "live event", "is live", "premieres in"];

const NETWORK: &[&str] = &[
    "network",
    "connection",
    "timed out",
    "unable to download webpage",
    "name resolution",
    "getaddrinfo",
];

/// Classify an error message printed by the extraction tool.
pub fn classify_message(message: &str) -> FetchError {
    debug!("Raw extractor error: {}", message.trim());

    let lower = message.to_lowercase();
    let message = summarize(message);
    let contains_any = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));

    if contains_any(REGEX_MISMATCH) {
        FetchError::ExtractionRegexMismatch(message)
    } else if contains_any(UNAVAILABLE) {
        FetchError::VideoUnavailable(message)
    } else if contains_any(AGE_RESTRICTED) {
        FetchError::AgeRestricted(message)
    } else if contains_any(LIVE) {
        FetchError::LiveStreamUnsupported(message)
    } else if contains_any(NETWORK) {
        FetchError::Network(message)
    } else {
        FetchError::ExtractionFailed(message)
    }
}

/// Classify a failure to spawn the extraction tool.
pub fn classify_spawn_error(tool: &str, err: std::io::Error) -> FetchError {
    if err.kind() == std::io::ErrorKind::NotFound {
        FetchError::ToolNotFound(tool.to_string())
    } else {
        FetchError::ToolFailed(format!("Failed to run {}: {}", tool, err))
    }
}

/// Classify an HTTP failure while fetching a stream.
pub fn classify_http_error(err: reqwest::Error) -> FetchError {
    debug!("Raw HTTP error: {:?}", err);

    if err.is_connect() || err.is_timeout() {
        return FetchError::Network(err.to_string());
    }

    match err.status().map(|s| s.as_u16()) {
        Some(404) | Some(410) => FetchError::VideoUnavailable(err.to_string()),
        Some(_) => FetchError::ExtractionFailed(err.to_string()),
        None => FetchError::Http(err),
    }
}

/// Keep the last `ERROR:` line of a multi-line stderr dump.
fn summarize(message: &str) -> String {
    let lines: Vec<&str> = message
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    lines
        .iter()
        .rev()
        .find(|l| l.starts_with("ERROR:"))
        .or_else(|| lines.last())
        .map(|l| l.to_string())
        .unwrap_or_default()
}
