//! Request acquisition from arguments or interactive prompts.

use crate::config::Settings;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// A single download request.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// Video URL as entered by the user.
    pub url: String,
    /// Directory the audio file is saved to.
    pub output_dir: PathBuf,
}

impl Request {
    /// Build a request from command-line arguments.
    ///
    /// A missing or blank output directory falls back to `default_dir`.
    pub fn from_args(url: &str, output_dir: Option<&str>, default_dir: &str) -> Self {
        let dir = match output_dir.map(str::trim) {
            Some(d) if !d.is_empty() => d,
            _ => default_dir,
        };

        Self {
            url: url.trim().to_string(),
            output_dir: Settings::expand_path(dir),
        }
    }
}

/// Prompt for the URL and save path.
pub fn read_interactive<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    default_dir: &str,
) -> io::Result<Request> {
    writeln!(writer, "No command-line arguments found. Asking for user input.")?;

    let url = prompt_line(reader, writer, "Enter the YouTube video URL: ")?;
    let dir = prompt_line(
        reader,
        writer,
        "Enter the save path (press Enter for current directory): ",
    )?;

    Ok(Request::from_args(&url, Some(dir.as_str()), default_dir))
}

fn prompt_line<R: BufRead, W: Write>(reader: &mut R, writer: &mut W, prompt: &str) -> io::Result<String> {
    write!(writer, "{}", prompt)?;
    writer.flush()?;

    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line.trim().to_string())
}
