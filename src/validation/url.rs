//! YouTube URL pattern checks.

use regex::Regex;
use std::sync::OnceLock;

/// URL shapes printed when a URL is rejected.
pub const SUPPORTED_FORMATS: &[&str] = &[
    "https://www.youtube.com/watch?v=VIDEO_ID",
    "https://youtu.be/VIDEO_ID",
    "https://www.youtube.com/embed/VIDEO_ID",
    "https://www.youtube.com/v/VIDEO_ID",
];

fn patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();

    PATTERNS.get_or_init(|| {
        [
            r"^https?://(?i:(?:www\.)?youtube\.com)/watch\?v=[\w-]+",
            r"^https?://(?i:(?:www\.)?youtube\.com)/watch\?.*v=[\w-]+",
            r"^https?://(?i:(?:www\.)?youtube\.com)/embed/[\w-]+",
            r"^https?://(?i:youtu\.be)/[\w-]+",
            r"^https?://(?i:(?:www\.)?youtube\.com)/v/[\w-]+",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("Invalid regex"))
        .collect()
    })
}

/// Returns true if `url` starts with one of the known YouTube video URL shapes.
///
/// Matching is anchored at the start only; trailing parameters are allowed.
pub fn is_valid_youtube_url(url: &str) -> bool {
    let url = url.trim();
    patterns().iter().any(|re| re.is_match(url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_known_shapes() {
        let valid = [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "http://youtube.com/watch?v=abc123",
            "https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://youtube.com/v/a-b_c",
            "https://www.youtube.com/watch?v=abc123&t=42s",
        ];

        for url in valid {
            assert!(is_valid_youtube_url(url), "expected valid: {}", url);
        }
    }

    #[test]
    fn test_host_is_case_insensitive() {
        assert!(is_valid_youtube_url("https://WWW.YouTube.com/watch?v=abc123"));
        assert!(is_valid_youtube_url("https://YOUTU.BE/abc123"));
    }

    #[test]
    fn test_rejects_other_inputs() {
        let invalid = [
            "not-a-url",
            "",
            "dQw4w9WgXcQ",
            "www.youtube.com/watch?v=abc123",
            "ftp://youtube.com/watch?v=abc123",
            "https://vimeo.com/12345",
            "https://www.youtube.com/watch?v=",
            "https://www.youtube.com/playlist?list=PL123",
            "https://www.youtu.be/abc123",
            "https://notyoutube.com/watch?v=abc123",
        ];

        for url in invalid {
            assert!(!is_valid_youtube_url(url), "expected invalid: {}", url);
        }
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        assert!(is_valid_youtube_url("  https://youtu.be/abc123\n"));
    }
}
