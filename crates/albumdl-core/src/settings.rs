//! Settings domain types and validation.
//!
//! Settings are process-wide and read by every new job at creation time.
//! A running job works from its own snapshot, so updates never reach it.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::paths::default_download_dir;

/// Default target encoding handed to the downloader.
pub const DEFAULT_AUDIO_FORMAT: &str = "mp3";

/// Encodings the downloader accepts for `--format`.
pub const SUPPORTED_AUDIO_FORMATS: &[&str] = &["mp3", "flac", "ogg", "opus", "m4a", "wav"];

/// Process-wide download settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Base directory for all downloads.
    pub download_path: PathBuf,
    /// Target audio encoding.
    pub audio_format: String,
}

impl Settings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            download_path: default_download_dir(),
            audio_format: DEFAULT_AUDIO_FORMAT.to_string(),
        }
    }

    /// Merge a partial update, only touching fields that are present.
    pub fn merge(&mut self, update: &SettingsUpdate) {
        if let Some(ref path) = update.download_path {
            self.download_path = PathBuf::from(path.trim());
        }
        if let Some(ref format) = update.audio_format {
            self.audio_format = format.trim().to_ascii_lowercase();
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Partial settings update as sent by clients.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub download_path: Option<String>,
    pub audio_format: Option<String>,
}

/// Settings validation error.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Download path cannot be empty")]
    EmptyDownloadPath,

    #[error("Unsupported audio format '{0}' (expected one of: mp3, flac, ogg, opus, m4a, wav)")]
    UnsupportedAudioFormat(String),
}

/// Validate settings values.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    if settings.download_path.as_os_str().is_empty() {
        return Err(SettingsError::EmptyDownloadPath);
    }

    if !SUPPORTED_AUDIO_FORMATS.contains(&settings.audio_format.as_str()) {
        return Err(SettingsError::UnsupportedAudioFormat(
            settings.audio_format.clone(),
        ));
    }

    Ok(())
}
