//! ytm4a - save the audio of a YouTube video as `.m4a`
//!
//! A small CLI that hands the heavy lifting to an extraction tool (yt-dlp)
//! and takes care of everything around it.
//!
//! # Overview
//!
//! One invocation runs a single linear pipeline:
//! - Read a video URL and an output directory (arguments or prompts)
//! - Validate the URL shape and make sure the directory is usable
//! - Resolve the video and pick the highest-bitrate audio-only stream
//! - Download it and normalize the file extension to `.m4a`
//!
//! # Architecture
//!
//! - `cli` - Argument parsing, prompts and terminal output
//! - `config` - Optional configuration file
//! - `validation` - URL and save path checks
//! - `extractor` - Extraction backends behind the `Extractor` trait
//! - `finalize` - Extension normalization and overwrite confirmation
//! - `orchestrator` - Pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use ytm4a::cli::{LineConfirm, Request};
//! use ytm4a::config::Settings;
//! use ytm4a::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(&settings);
//!
//!     let request = Request::from_args("https://youtu.be/dQw4w9WgXcQ", Some("music"), ".");
//!     let outcome = orchestrator.process(&request, &mut LineConfirm::stdio()).await?;
//!     println!("{:?}", outcome);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod finalize;
pub mod orchestrator;
pub mod validation;

pub use error::{FetchError, Result};
