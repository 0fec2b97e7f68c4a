//! Configuration module for ytm4a.
//!
//! Settings are optional: without a configuration file every value falls back
//! to its default.

mod settings;

pub use settings::{Backend, ExtractorSettings, GeneralSettings, OutputSettings, Settings};
