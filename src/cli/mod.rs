//! CLI module for ytm4a.

pub mod input;
mod output;
pub mod preflight;
pub mod prompt;

pub use input::Request;
pub use output::{format_count, Output};
pub use prompt::{AssumeYes, Confirm, LineConfirm};

use crate::config::Backend;
use clap::Parser;

/// ytm4a - save the audio of a YouTube video as .m4a
///
/// Run without arguments to be asked for the URL and save path.
#[derive(Parser, Debug)]
#[command(name = "ytm4a")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// YouTube video URL (prompted for when omitted)
    pub url: Option<String>,

    /// Directory to save the audio file in (default: current directory)
    pub output_dir: Option<String>,

    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Extraction backend to use (overrides the configuration file)
    #[arg(short, long, value_enum)]
    pub backend: Option<Backend>,

    /// Overwrite existing files without asking
    #[arg(short, long)]
    pub yes: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positionals() {
        let cli = Cli::parse_from(["ytm4a", "https://youtu.be/abc123", "out"]);
        assert_eq!(cli.url.as_deref(), Some("https://youtu.be/abc123"));
        assert_eq!(cli.output_dir.as_deref(), Some("out"));
        assert!(!cli.yes);
        assert!(cli.backend.is_none());
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from(["ytm4a", "-vv", "--backend", "direct", "-y"]);
        assert!(cli.url.is_none());
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.backend, Some(Backend::Direct));
        assert!(cli.yes);
    }
}
