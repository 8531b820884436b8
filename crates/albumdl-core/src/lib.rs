//! Core domain for albumdl.
//!
//! Pure data types and port definitions shared by the download engine and
//! the HTTP adapter. Nothing in this crate spawns processes or opens sockets.
//!
//! - `job` - job identity, lifecycle state machine and track progress
//! - `request` - validated album download requests
//! - `settings` - process-wide download settings and their validation
//! - `paths` - filename sanitizing and target directory planning
//! - `ports` - the `CommandRunner` port and the core error taxonomy
//! - `services` - `SettingsService`, the owner of live settings

#![deny(unused_crate_dependencies)]

pub mod job;
pub mod paths;
pub mod ports;
pub mod request;
pub mod services;
pub mod settings;

// Re-export commonly used types for convenience
pub use job::{
    COMPLETE_PROGRESS, COVER_ART_PROGRESS, Job, JobId, JobStatus, SETUP_PROGRESS, TrackProgress,
};
pub use paths::{PathError, album_directory, default_download_dir, ensure_directory, sanitize_filename};
pub use ports::{
    CommandExit, CommandOutput, CommandRunner, CommandSpec, CoreError, DEFAULT_COMMAND_TIMEOUT,
    RunnerError,
};
pub use request::{AlbumRequest, ReleaseKind};
pub use services::SettingsService;
pub use settings::{
    DEFAULT_AUDIO_FORMAT, SUPPORTED_AUDIO_FORMATS, Settings, SettingsError, SettingsUpdate,
    validate_settings,
};

#[cfg(any(test, feature = "test-utils"))]
pub use ports::MockCommandRunner;

// Dev-dependencies only exercised by some test modules
#[cfg(test)]
use serde_json as _;
