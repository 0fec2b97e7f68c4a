//! Configuration settings for ytm4a.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub output: OutputSettings,
    pub extractor: ExtractorSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level used when no -v flag or RUST_LOG is given.
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// Where files are saved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Directory used when none is given on the command line.
    pub default_dir: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            default_dir: ".".to_string(),
        }
    }
}

/// Extraction backend type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// yt-dlp resolves and downloads (default).
    #[default]
    Ytdlp,
    /// yt-dlp resolves, ytm4a downloads the stream over HTTP.
    Direct,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Ytdlp => write!(f, "ytdlp"),
            Backend::Direct => write!(f, "direct"),
        }
    }
}

/// Extraction tool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorSettings {
    /// Backend used to fetch audio.
    pub backend: Backend,
    /// Path or name of the yt-dlp executable.
    pub ytdlp_path: String,
    /// Extra arguments passed to every yt-dlp invocation.
    pub extra_args: Vec<String>,
}

impl Default for ExtractorSettings {
    fn default() -> Self {
        Self {
            backend: Backend::Ytdlp,
            ytdlp_path: "yt-dlp".to_string(),
            extra_args: Vec::new(),
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    ///
    /// A missing file yields the defaults.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ytm4a")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.output.default_dir, ".");
        assert_eq!(settings.extractor.backend, Backend::Ytdlp);
        assert_eq!(settings.extractor.ytdlp_path, "yt-dlp");
        assert!(settings.extractor.extra_args.is_empty());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [extractor]
            backend = "direct"
            extra_args = ["--cookies-from-browser", "firefox"]
            "#,
        )
        .unwrap();

        assert_eq!(settings.extractor.backend, Backend::Direct);
        assert_eq!(settings.extractor.ytdlp_path, "yt-dlp");
        assert_eq!(settings.extractor.extra_args.len(), 2);
        assert_eq!(settings.general.log_level, "warn");
    }

    #[test]
    fn test_load_from_file_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[output]\ndefault_dir = \"~/Music\"\n").unwrap();

        let settings = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(settings.output.default_dir, "~/Music");
        assert!(!Settings::expand_path(&settings.output.default_dir)
            .to_string_lossy()
            .starts_with('~'));

        let missing = dir.path().join("missing.toml");
        let settings = Settings::load_from(Some(&missing)).unwrap();
        assert_eq!(settings.output.default_dir, ".");
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[extractor]\nbackend = \"pytube\"\n").unwrap();

        assert!(Settings::load_from(Some(&path)).is_err());
    }
}
