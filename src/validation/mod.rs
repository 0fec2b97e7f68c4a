//! Input validation for requests.
//!
//! Both checks run before any extractor call so that an invalid request never
//! reaches the network.

mod save_path;
mod url;

pub use save_path::{ensure_output_dir, validate_save_path};
pub use url::{is_valid_youtube_url, SUPPORTED_FORMATS};
