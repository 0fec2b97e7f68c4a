//! yt-dlp backend.

use super::classify::{classify_message, classify_spawn_error};
use super::{output_stem, Extractor, StreamFormat, VideoMetadata};
use crate::cli::{preflight, Output};
use crate::error::{FetchError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument};

/// Extractor that shells out to the `yt-dlp` executable.
#[derive(Debug, Clone)]
pub struct YtDlpExtractor {
    program: String,
    extra_args: Vec<String>,
}

impl YtDlpExtractor {
    pub fn new() -> Self {
        Self::with_config("yt-dlp", Vec::new())
    }

    /// Use a specific executable and extra arguments passed before every call.
    pub fn with_config(program: &str, extra_args: Vec<String>) -> Self {
        Self {
            program: program.to_string(),
            extra_args,
        }
    }

    fn resolve_args(url: &str) -> Vec<String> {
        [
            "--dump-json",
            "--no-download",
            "--no-playlist",
            "--no-warnings",
            url,
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn download_args(metadata: &VideoMetadata, stream: &StreamFormat, output_dir: &Path) -> Vec<String> {
        // `%` starts a yt-dlp template field
        let stem = output_stem(metadata).replace('%', "%%");
        let template = output_dir.join(format!("{}.%(ext)s", stem));

        vec![
            "-f".to_string(),
            stream.format_id.clone(),
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            "--output".to_string(),
            template.to_string_lossy().into_owned(),
            "--print".to_string(),
            "after_move:filepath".to_string(),
            "--no-simulate".to_string(),
            source_url(metadata).to_string(),
        ]
    }

    /// Run yt-dlp and return its stdout.
    async fn run(&self, args: &[String]) -> Result<String> {
        debug!("Running {} {:?}", self.program, args);

        let output = Command::new(&self.program)
            .args(&self.extra_args)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| classify_spawn_error(&self.program, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.trim().is_empty() {
                return Err(FetchError::ExtractionFailed(format!(
                    "{} exited with {}",
                    self.program, output.status
                )));
            }
            return Err(classify_message(&stderr));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for YtDlpExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Extractor for YtDlpExtractor {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    fn check(&self) -> Result<()> {
        preflight::check_tool(&self.program)
    }

    #[instrument(skip(self))]
    async fn resolve(&self, url: &str) -> Result<VideoMetadata> {
        info!("Resolving video metadata");
        let stdout = self.run(&Self::resolve_args(url)).await?;
        parse_info(&stdout)
    }

    #[instrument(skip_all, fields(format_id = %stream.format_id))]
    async fn download(
        &self,
        metadata: &VideoMetadata,
        stream: &StreamFormat,
        output_dir: &Path,
    ) -> Result<PathBuf> {
        info!("Downloading stream into {}", output_dir.display());

        let spinner = Output::spinner("Downloading...");
        let result = self
            .run(&Self::download_args(metadata, stream, output_dir))
            .await;
        spinner.finish_and_clear();
        let stdout = result?;

        let printed = stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .last();

        let path = match printed {
            Some(p) => PathBuf::from(p),
            None => output_dir.join(format!("{}.{}", output_stem(metadata), stream.ext)),
        };

        debug!("yt-dlp wrote {}", path.display());
        Ok(path)
    }
}

fn source_url(metadata: &VideoMetadata) -> &str {
    if metadata.webpage_url.is_empty() {
        &metadata.id
    } else {
        &metadata.webpage_url
    }
}

/// Subset of `yt-dlp --dump-json` output that ytm4a reads.
#[derive(Debug, Deserialize)]
struct RawInfo {
    id: String,
    title: Option<String>,
    uploader: Option<String>,
    channel: Option<String>,
    duration: Option<f64>,
    view_count: Option<u64>,
    is_live: Option<bool>,
    live_status: Option<String>,
    webpage_url: Option<String>,
    #[serde(default)]
    formats: Vec<RawFormat>,
}

#[derive(Debug, Deserialize)]
struct RawFormat {
    format_id: String,
    ext: Option<String>,
    acodec: Option<String>,
    vcodec: Option<String>,
    abr: Option<f64>,
    url: Option<String>,
    http_headers: Option<HashMap<String, String>>,
    filesize: Option<u64>,
    filesize_approx: Option<f64>,
}

impl From<RawFormat> for StreamFormat {
    fn from(raw: RawFormat) -> Self {
        StreamFormat {
            format_id: raw.format_id,
            ext: raw.ext.unwrap_or_else(|| "m4a".to_string()),
            audio_codec: raw.acodec,
            video_codec: raw.vcodec,
            abr: raw.abr,
            url: raw.url,
            http_headers: raw.http_headers.unwrap_or_default(),
            filesize: raw
                .filesize
                .or_else(|| raw.filesize_approx.map(|s| s as u64)),
        }
    }
}

/// Parse `--dump-json` output into [`VideoMetadata`].
fn parse_info(json: &str) -> Result<VideoMetadata> {
    let raw: RawInfo = serde_json::from_str(json.trim())?;

    let live = raw.is_live.unwrap_or(false)
        || matches!(raw.live_status.as_deref(), Some("is_live") | Some("is_upcoming"));

    if live {
        return Err(FetchError::LiveStreamUnsupported(format!(
            "{} is a live stream",
            raw.id
        )));
    }

    Ok(VideoMetadata {
        webpage_url: raw
            .webpage_url
            .unwrap_or_else(|| format!("https://www.youtube.com/watch?v={}", raw.id)),
        title: raw.title.unwrap_or_else(|| "Unknown".to_string()),
        uploader: raw.uploader.or(raw.channel),
        duration_seconds: raw.duration.map(|d| d as u64),
        view_count: raw.view_count,
        formats: raw.formats.into_iter().map(StreamFormat::from).collect(),
        id: raw.id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::select_best_audio_stream;

    const SAMPLE: &str = r#"{
        "id": "dQw4w9WgXcQ",
        "title": "Never Gonna Give You Up",
        "uploader": "Rick Astley",
        "duration": 212.0,
        "view_count": 1500000000,
        "is_live": false,
        "live_status": "not_live",
        "webpage_url": "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
        "formats": [
            {"format_id": "sb0", "ext": "mhtml", "acodec": "none", "vcodec": "none"},
            {"format_id": "140", "ext": "m4a", "acodec": "mp4a.40.2", "vcodec": "none", "abr": 129.478,
             "url": "https://example.invalid/140", "filesize": 3433514,
             "http_headers": {"User-Agent": "Mozilla/5.0"}},
            {"format_id": "251", "ext": "webm", "acodec": "opus", "vcodec": "none", "abr": 135.2,
             "filesize_approx": 3500000.0},
            {"format_id": "18", "ext": "mp4", "acodec": "mp4a.40.2", "vcodec": "avc1.42001E", "abr": null}
        ]
    }"#;

    #[test]
    fn test_parse_info() {
        let meta = parse_info(SAMPLE).unwrap();

        assert_eq!(meta.id, "dQw4w9WgXcQ");
        assert_eq!(meta.title, "Never Gonna Give You Up");
        assert_eq!(meta.uploader.as_deref(), Some("Rick Astley"));
        assert_eq!(meta.duration_seconds, Some(212));
        assert_eq!(meta.view_count, Some(1_500_000_000));
        assert_eq!(meta.formats.len(), 4);

        let m4a = &meta.formats[1];
        assert_eq!(m4a.http_headers.get("User-Agent").map(String::as_str), Some("Mozilla/5.0"));
        assert_eq!(meta.formats[2].filesize, Some(3_500_000));

        let best = select_best_audio_stream(&meta).unwrap();
        assert_eq!(best.format_id, "251");
        assert_eq!(best.ext, "webm");
    }

    #[test]
    fn test_parse_minimal_info() {
        let meta = parse_info(r#"{"id": "abc123", "channel": "Someone"}"#).unwrap();

        assert_eq!(meta.title, "Unknown");
        assert_eq!(meta.uploader.as_deref(), Some("Someone"));
        assert_eq!(meta.webpage_url, "https://www.youtube.com/watch?v=abc123");
        assert!(meta.formats.is_empty());
    }

    #[test]
    fn test_live_stream_is_rejected() {
        let err = parse_info(r#"{"id": "live1", "is_live": true}"#).unwrap_err();
        assert!(matches!(err, FetchError::LiveStreamUnsupported(_)));

        let err = parse_info(r#"{"id": "soon", "live_status": "is_upcoming"}"#).unwrap_err();
        assert!(matches!(err, FetchError::LiveStreamUnsupported(_)));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(parse_info("not json"), Err(FetchError::Json(_))));
    }

    #[test]
    fn test_download_args() {
        let mut meta = parse_info(SAMPLE).unwrap();
        meta.title = "100% Pure: Hits".to_string();
        let stream = meta.formats[2].clone();

        let args = YtDlpExtractor::download_args(&meta, &stream, Path::new("/music"));

        assert_eq!(&args[..2], &["-f".to_string(), "251".to_string()]);
        assert!(args.contains(&"/music/100%% Pure_ Hits.%(ext)s".to_string()));
        assert!(args.contains(&"after_move:filepath".to_string()));
        assert_eq!(args.last().unwrap(), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    }

    #[test]
    fn test_resolve_args_end_with_url() {
        let args = YtDlpExtractor::resolve_args("https://youtu.be/abc123");
        assert!(args.contains(&"--dump-json".to_string()));
        assert!(args.contains(&"--no-playlist".to_string()));
        assert_eq!(args.last().unwrap(), "https://youtu.be/abc123");
    }

    #[tokio::test]
    async fn test_missing_tool() {
        let extractor = YtDlpExtractor::with_config("ytm4a-definitely-missing-tool", Vec::new());
        let err = extractor.resolve("https://youtu.be/abc123").await.unwrap_err();
        assert!(matches!(err, FetchError::ToolNotFound(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_tool_stderr_is_classified() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake-ytdlp.sh");
        std::fs::write(
            &script,
            "echo 'ERROR: [youtube] abc123: Video unavailable' >&2\nexit 1\n",
        )
        .unwrap();

        let extractor =
            YtDlpExtractor::with_config("sh", vec![script.to_string_lossy().into_owned()]);
        let err = extractor.resolve("https://youtu.be/abc123").await.unwrap_err();
        assert!(matches!(err, FetchError::VideoUnavailable(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_resolve_and_download_through_tool() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("info.json");
        std::fs::write(&json, SAMPLE).unwrap();

        let script = dir.path().join("fake-ytdlp.sh");
        std::fs::write(&script, format!("cat '{}'\n", json.display())).unwrap();
        let extractor =
            YtDlpExtractor::with_config("sh", vec![script.to_string_lossy().into_owned()]);
        let meta = extractor.resolve("https://youtu.be/dQw4w9WgXcQ").await.unwrap();
        assert_eq!(meta.title, "Never Gonna Give You Up");

        let written = dir.path().join("Never Gonna Give You Up.webm");
        std::fs::write(
            &script,
            format!("touch '{0}'\necho '{0}'\n", written.display()),
        )
        .unwrap();
        let stream = select_best_audio_stream(&meta).unwrap().clone();
        let path = extractor.download(&meta, &stream, dir.path()).await.unwrap();

        assert_eq!(path, written);
        assert!(path.is_file());
    }
}
