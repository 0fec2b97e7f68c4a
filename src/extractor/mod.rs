//! Extraction backends for ytm4a.
//!
//! Provides a trait-based interface over the external tool that resolves a
//! video URL into metadata and downloadable streams. The CLI and validation
//! code only ever talk to [`Extractor`]; which backend sits behind it is a
//! configuration choice.

pub mod classify;
mod direct;
mod ytdlp;

pub use direct::DirectExtractor;
pub use ytdlp::YtDlpExtractor;

use crate::config::{Backend, Settings};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// One stream offered for a video.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamFormat {
    /// Backend-specific format identifier.
    pub format_id: String,
    /// Container extension of the stream (e.g. `webm`, `m4a`).
    pub ext: String,
    /// Audio codec, `None` or `"none"` if the stream has no audio.
    pub audio_codec: Option<String>,
    /// Video codec, `None` or `"none"` if the stream has no video.
    pub video_codec: Option<String>,
    /// Average audio bitrate in kbps.
    pub abr: Option<f64>,
    /// Direct media URL, if the backend exposes one.
    pub url: Option<String>,
    /// Headers required when fetching `url`.
    pub http_headers: HashMap<String, String>,
    /// Size in bytes, exact or approximate.
    pub filesize: Option<u64>,
}

impl StreamFormat {
    /// True if the stream carries audio and no video.
    pub fn is_audio_only(&self) -> bool {
        has_codec(&self.audio_codec) && !has_codec(&self.video_codec)
    }
}

fn has_codec(codec: &Option<String>) -> bool {
    codec
        .as_deref()
        .is_some_and(|c| !c.is_empty() && c != "none")
}

/// Metadata about a resolved video.
#[derive(Debug, Clone, Default)]
pub struct VideoMetadata {
    /// Video identifier.
    pub id: String,
    /// Title.
    pub title: String,
    /// Channel or uploader name (if available).
    pub uploader: Option<String>,
    /// Duration in seconds (if known).
    pub duration_seconds: Option<u64>,
    /// View count (if known).
    pub view_count: Option<u64>,
    /// Canonical page URL.
    pub webpage_url: String,
    /// All offered streams, in the order the backend listed them.
    pub formats: Vec<StreamFormat>,
}

impl VideoMetadata {
    /// Duration as `M:SS`.
    pub fn format_duration(&self) -> Option<String> {
        self.duration_seconds
            .map(|d| format!("{}:{:02}", d / 60, d % 60))
    }
}

/// Trait for extraction backends.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Backend name (for logging).
    fn name(&self) -> &'static str;

    /// Verify the backend can run at all (e.g. its tool is installed).
    fn check(&self) -> Result<()> {
        Ok(())
    }

    /// Fetch metadata and the list of offered streams for a URL.
    async fn resolve(&self, url: &str) -> Result<VideoMetadata>;

    /// Download `stream` into `output_dir`, returning the written file.
    async fn download(
        &self,
        metadata: &VideoMetadata,
        stream: &StreamFormat,
        output_dir: &Path,
    ) -> Result<PathBuf>;
}

/// Picks the audio-only stream with the highest average bitrate.
///
/// Streams without a known bitrate rank below any known one. On equal
/// bitrates the stream listed first wins.
pub fn select_best_audio_stream(metadata: &VideoMetadata) -> Option<&StreamFormat> {
    let mut best: Option<&StreamFormat> = None;

    for format in metadata.formats.iter().filter(|f| f.is_audio_only()) {
        let better = match best {
            None => true,
            Some(current) => bitrate_rank(format) > bitrate_rank(current),
        };
        if better {
            best = Some(format);
        }
    }

    best
}

fn bitrate_rank(format: &StreamFormat) -> f64 {
    format.abr.unwrap_or(f64::NEG_INFINITY)
}

/// File name (without extension) used for a downloaded video.
///
/// Characters that are invalid in file names on common platforms are replaced
/// with `_`. Falls back to the video id if nothing usable is left.
pub fn output_stem(metadata: &VideoMetadata) -> String {
    let cleaned: String = metadata
        .title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let cleaned = cleaned.trim().trim_end_matches('.').trim_end();

    if cleaned.is_empty() {
        if metadata.id.is_empty() {
            "audio".to_string()
        } else {
            metadata.id.clone()
        }
    } else {
        cleaned.to_string()
    }
}

/// Create the extractor selected in the settings.
pub fn create_extractor(settings: &Settings) -> Box<dyn Extractor> {
    let ytdlp = YtDlpExtractor::with_config(
        &settings.extractor.ytdlp_path,
        settings.extractor.extra_args.clone(),
    );

    match settings.extractor.backend {
        Backend::Ytdlp => Box::new(ytdlp),
        Backend::Direct => Box::new(DirectExtractor::new(ytdlp)),
    }
}
