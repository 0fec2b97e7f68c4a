//! Direct HTTP backend.
//!
//! Metadata still comes from yt-dlp, but the selected stream is fetched by
//! ytm4a itself from the format's media URL.

use super::classify::classify_http_error;
use super::{output_stem, Extractor, StreamFormat, VideoMetadata, YtDlpExtractor};
use crate::cli::Output;
use crate::error::{FetchError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument, warn};

/// Extractor that resolves with yt-dlp and downloads over HTTP.
pub struct DirectExtractor {
    resolver: YtDlpExtractor,
    client: reqwest::Client,
}

impl DirectExtractor {
    pub fn new(resolver: YtDlpExtractor) -> Self {
        Self {
            resolver,
            client: reqwest::Client::new(),
        }
    }

    /// Fetch `url` into `part_path`, returning the number of bytes written.
    async fn fetch_to(&self, url: &str, stream: &StreamFormat, part_path: &Path) -> Result<u64> {
        let response = self
            .client
            .get(url)
            .headers(header_map(stream))
            .send()
            .await
            .map_err(classify_http_error)?
            .error_for_status()
            .map_err(classify_http_error)?;

        let total = response.content_length().or(stream.filesize);
        let progress = match total {
            Some(len) => Output::progress_bar(len, "Downloading"),
            None => Output::spinner("Downloading..."),
        };

        let mut file = tokio::fs::File::create(part_path).await?;
        let mut response = response;
        let mut written = 0u64;

        while let Some(chunk) = response.chunk().await.map_err(classify_http_error)? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
            progress.set_position(written);
        }

        file.flush().await?;
        progress.finish_and_clear();

        Ok(written)
    }
}

#[async_trait]
impl Extractor for DirectExtractor {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn check(&self) -> Result<()> {
        self.resolver.check()
    }

    async fn resolve(&self, url: &str) -> Result<VideoMetadata> {
        self.resolver.resolve(url).await
    }

    #[instrument(skip_all, fields(format_id = %stream.format_id))]
    async fn download(
        &self,
        metadata: &VideoMetadata,
        stream: &StreamFormat,
        output_dir: &Path,
    ) -> Result<PathBuf> {
        let url = stream.url.as_deref().ok_or_else(|| {
            FetchError::ExtractionFailed(format!(
                "Format {} has no direct media URL",
                stream.format_id
            ))
        })?;

        let target = download_path(metadata, stream, output_dir);
        let part_path = part_path(&target);

        info!("Downloading {} to {}", stream.format_id, target.display());

        match self.fetch_to(url, stream, &part_path).await {
            Ok(bytes) => {
                debug!("Received {} bytes", bytes);
                tokio::fs::rename(&part_path, &target).await?;
                Ok(target)
            }
            Err(e) => {
                if let Err(cleanup) = tokio::fs::remove_file(&part_path).await {
                    if cleanup.kind() != std::io::ErrorKind::NotFound {
                        warn!("Failed to remove partial download: {}", cleanup);
                    }
                }
                Err(e)
            }
        }
    }
}

/// Where a stream is written: `<dir>/<stem>.<ext>`.
fn download_path(metadata: &VideoMetadata, stream: &StreamFormat, output_dir: &Path) -> PathBuf {
    output_dir.join(format!("{}.{}", output_stem(metadata), stream.ext))
}

fn part_path(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

/// Convert the format's headers, skipping any that are not valid HTTP.
fn header_map(stream: &StreamFormat) -> HeaderMap {
    let mut headers = HeaderMap::new();

    for (key, value) in &stream.http_headers {
        match (
            HeaderName::from_bytes(key.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => warn!("Skipping invalid header {}", key),
        }
    }

    headers
}
