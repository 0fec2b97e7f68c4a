//! Pipeline orchestrator for ytm4a.
//!
//! Coordinates a single request from validation to the final `.m4a` file.

use crate::cli::{format_count, Confirm, Output, Request};
use crate::config::Settings;
use crate::error::{FetchError, Result};
use crate::extractor::{
    create_extractor, output_stem, select_best_audio_stream, Extractor, StreamFormat,
    VideoMetadata,
};
use crate::finalize::{self, Finalized};
use crate::validation::{ensure_output_dir, is_valid_youtube_url, validate_save_path};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// How a run ended, when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Audio saved at this absolute path.
    Saved(PathBuf),
    /// The user declined to overwrite an existing file.
    Cancelled,
    /// The video offers no audio-only stream.
    NoAudioStream,
}

impl Outcome {
    /// Process exit status for this outcome.
    pub fn exit_code(&self) -> u8 {
        0
    }
}

/// The main orchestrator for the ytm4a pipeline.
pub struct Orchestrator {
    extractor: Box<dyn Extractor>,
}

impl Orchestrator {
    /// Create an orchestrator with the backend selected in `settings`.
    pub fn new(settings: &Settings) -> Self {
        Self::with_extractor(create_extractor(settings))
    }

    /// Create an orchestrator with a custom extractor.
    pub fn with_extractor(extractor: Box<dyn Extractor>) -> Self {
        Self { extractor }
    }

    /// Run the whole pipeline for one request.
    #[instrument(skip_all, fields(url = %request.url, backend = self.extractor.name()))]
    pub async fn process(&self, request: &Request, confirm: &mut dyn Confirm) -> Result<Outcome> {
        if !is_valid_youtube_url(&request.url) {
            return Err(FetchError::InvalidUrlFormat(request.url.clone()));
        }

        let output_dir = &request.output_dir;
        validate_save_path(output_dir)?;
        self.extractor.check()?;

        if !output_dir.is_dir() {
            Output::info(&format!("Creating directory: {}", output_dir.display()));
        }
        ensure_output_dir(output_dir)?;

        Output::info(&format!("Connecting to YouTube with URL: {}", request.url));
        let spinner = Output::spinner("Fetching video details...");
        let resolved = self.extractor.resolve(&request.url).await;
        spinner.finish_and_clear();
        let metadata = resolved?;

        print_details(&metadata);

        Output::info("Searching for the best audio stream...");
        let Some(stream) = select_best_audio_stream(&metadata) else {
            Output::warning("No audio-only streams found for this video.");
            return Ok(Outcome::NoAudioStream);
        };
        info!("Selected format {} ({})", stream.format_id, stream.ext);
        Output::info(&format!(
            "Found audio stream with bitrate: {}",
            format_abr(stream)
        ));

        let planned = planned_path(&metadata, stream, output_dir);
        if planned.exists() && !finalize::confirm_overwrite(&planned, confirm)? {
            Output::info("Download cancelled. File not overwritten.");
            return Ok(Outcome::Cancelled);
        }

        Output::info(&format!("Downloading '{}'...", metadata.title));
        let downloaded = self
            .extractor
            .download(&metadata, stream, output_dir)
            .await?;
        Output::success("Download completed successfully!");

        match finalize::finalize(&downloaded, confirm)? {
            Finalized::Saved(path) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                Output::success(&format!("File successfully saved as: {}", name));
                Output::kv("File location", &path.display().to_string());
                Ok(Outcome::Saved(path))
            }
            Finalized::Declined => {
                Output::info("Download cancelled. File not overwritten.");
                Ok(Outcome::Cancelled)
            }
        }
    }
}

/// Final location a stream will have once downloaded and renamed.
fn planned_path(metadata: &VideoMetadata, stream: &StreamFormat, output_dir: &Path) -> PathBuf {
    let downloaded = output_dir.join(format!("{}.{}", output_stem(metadata), stream.ext));
    finalize::target_path(&downloaded)
}

fn format_abr(stream: &StreamFormat) -> String {
    match stream.abr {
        Some(abr) => format!("{}kbps", abr.round() as u64),
        None => "unknown".to_string(),
    }
}

fn print_details(metadata: &VideoMetadata) {
    Output::header(&metadata.title);
    Output::kv(
        "Uploader",
        metadata.uploader.as_deref().unwrap_or("Unknown"),
    );
    if let Some(duration) = metadata.format_duration() {
        Output::kv("Duration", &format!("{} minutes", duration));
    }
    let views = metadata
        .view_count
        .map(format_count)
        .unwrap_or_else(|| "Unknown".to_string());
    Output::kv("Views", &views);
    println!();
}
