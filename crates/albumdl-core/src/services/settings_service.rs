//! Settings service - owns the live process-wide settings.

use tokio::sync::RwLock;

use crate::ports::CoreError;
use crate::settings::{Settings, SettingsUpdate, validate_settings};

/// Service for settings operations.
///
/// Updates are validated on a copy and swapped in whole, so readers never
/// observe a half-applied update.
pub struct SettingsService {
    current: RwLock<Settings>,
}

impl SettingsService {
    /// Create a new settings service.
    pub fn new(initial: Settings) -> Self {
        Self {
            current: RwLock::new(initial),
        }
    }

    /// Owned copy of the current settings, for a job to keep for its lifetime.
    pub async fn snapshot(&self) -> Settings {
        self.current.read().await.clone()
    }

    /// Update settings with partial changes.
    pub async fn update(&self, update: &SettingsUpdate) -> Result<Settings, CoreError> {
        let mut current = self.current.write().await;
        let mut next = current.clone();
        next.merge(update);
        validate_settings(&next)?;
        *current = next.clone();

        tracing::info!(
            target: "albumdl.settings",
            download_path = %next.download_path.display(),
            audio_format = %next.audio_format,
            "Settings updated"
        );
        Ok(next)
    }
}

impl Default for SettingsService {
    fn default() -> Self {
        Self::new(Settings::with_defaults())
    }
}
