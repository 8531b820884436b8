//! Filesystem path utilities.
//!
//! - `sanitize` - map arbitrary artist/album names to safe directory names
//! - `target` - plan and create the directory a job downloads into

mod error;
mod sanitize;
mod target;

pub use error::PathError;
pub use sanitize::sanitize_filename;
pub use target::{SINGLES_DIR, album_directory, default_download_dir, ensure_directory};
