//! Job domain types.
//!
//! A [`Job`] is one tracked album download. Its lifecycle only moves forward:
//! `queued -> downloading -> completed | error`. All mutation goes through the
//! methods on [`Job`], which refuse backward transitions and keep `progress`
//! inside `0..=100` and non-decreasing while downloading.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::request::AlbumRequest;

/// Progress reserved for job setup (directory creation, process start).
pub const SETUP_PROGRESS: u8 = 25;

/// Progress floor once the download finished and cover art is being fixed.
pub const COVER_ART_PROGRESS: u8 = 75;

/// Progress of a completed job.
pub const COMPLETE_PROGRESS: u8 = 100;

/// Opaque, collision-free job identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Generate a fresh identifier (random v4 UUID, simple form).
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for JobId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Lifecycle state of a job.
///
/// `NotFound` is never stored; it is the status reported for unknown ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Downloading,
    Completed,
    Error,
    NotFound,
}

impl JobStatus {
    /// Whether this is an absorbing state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }

    /// Whether a job in `self` may move to `next`.
    ///
    /// `queued -> downloading | error` and `downloading -> completed | error`.
    /// Terminal states accept nothing.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Queued, Self::Downloading | Self::Error)
                | (Self::Downloading, Self::Completed | Self::Error)
        )
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Downloading => "downloading",
            Self::Completed => "completed",
            Self::Error => "error",
            Self::NotFound => "not_found",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Track counters derived from downloader output.
///
/// `total_tracks == 0` means the total is still unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackProgress {
    pub current_track: u32,
    pub total_tracks: u32,
    pub progress: u8,
}

impl TrackProgress {
    /// State at the moment the downloader process is started.
    #[must_use]
    pub const fn starting() -> Self {
        Self {
            current_track: 0,
            total_tracks: 0,
            progress: SETUP_PROGRESS,
        }
    }

    /// Human-readable description of the current track position.
    ///
    /// The total is omitted while it is unknown or already overrun.
    #[must_use]
    pub fn message(&self) -> String {
        if self.total_tracks > 0 && self.current_track <= self.total_tracks {
            format!(
                "Downloading track {}/{}",
                self.current_track, self.total_tracks
            )
        } else {
            format!("Downloading track {}", self.current_track)
        }
    }
}

/// One tracked album download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    pub message: String,
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_track: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_tracks: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_path: Option<PathBuf>,
    #[serde(flatten)]
    pub request: AlbumRequest,
    /// Audio format snapshotted from settings when the job was created.
    #[serde(rename = "format")]
    pub audio_format: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Create a job record in the `queued` state.
    pub fn queued(id: JobId, request: AlbumRequest, audio_format: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            status: JobStatus::Queued,
            message: "Queued".to_string(),
            progress: 0,
            current_track: None,
            total_tracks: None,
            result_path: None,
            request,
            audio_format: audio_format.into(),
            created_at: now,
            updated_at: now,
        }
    }

    fn transition(&mut self, next: JobStatus) -> bool {
        if self.status == next {
            return true;
        }
        if !self.status.can_transition_to(next) {
            tracing::warn!(
                target: "albumdl.job",
                id = %self.id,
                from = %self.status,
                to = %next,
                "Refusing backward job transition"
            );
            return false;
        }
        self.status = next;
        true
    }

    /// Move into `downloading` with progress 0.
    pub fn begin(&mut self) -> bool {
        if self.status != JobStatus::Queued {
            return false;
        }
        self.transition(JobStatus::Downloading);
        self.message = "Starting download...".to_string();
        self.progress = 0;
        true
    }

    /// Set a stage message and raise progress to at least `progress`.
    ///
    /// Ignored unless the job is downloading.
    pub fn set_stage(&mut self, message: impl Into<String>, progress: u8) -> bool {
        if self.status != JobStatus::Downloading {
            return false;
        }
        self.message = message.into();
        self.progress = self.progress.max(progress.min(COMPLETE_PROGRESS));
        true
    }

    /// Merge parsed track counters into the job.
    ///
    /// The message is refreshed only when the current track moved.
    pub fn apply_tracks(&mut self, tracks: TrackProgress) -> bool {
        if self.status != JobStatus::Downloading {
            return false;
        }
        if tracks.total_tracks > 0 {
            self.total_tracks = Some(tracks.total_tracks);
        }
        if tracks.current_track > 0 && self.current_track != Some(tracks.current_track) {
            self.current_track = Some(tracks.current_track);
            self.message = tracks.message();
        }
        self.progress = self.progress.max(tracks.progress.min(COMPLETE_PROGRESS));
        true
    }

    /// Absorb into `error`. Progress resets to 0.
    pub fn fail(&mut self, message: impl Into<String>) -> bool {
        if !self.transition(JobStatus::Error) {
            return false;
        }
        self.message = message.into();
        self.progress = 0;
        true
    }

    /// Absorb into `completed` with the directory holding the downloaded files.
    pub fn complete(&mut self, result_path: &Path) -> bool {
        if self.status != JobStatus::Downloading || !self.transition(JobStatus::Completed) {
            return false;
        }
        self.message = format!("Download completed: {}", result_path.display());
        self.progress = COMPLETE_PROGRESS;
        self.result_path = Some(result_path.to_path_buf());
        true
    }

    /// Refresh `updated_at`.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::ReleaseKind;

    fn sample_job() -> Job {
        let request = AlbumRequest {
            url: "https://open.spotify.com/album/abc".to_string(),
            artist: "Artist".to_string(),
            album: "Album".to_string(),
            kind: ReleaseKind::Album,
        };
        Job::queued(JobId::from("job-1"), request, "mp3")
    }

    #[test]
    fn generated_ids_are_unique() {
        let ids: std::collections::HashSet<_> = (0..1000).map(|_| JobId::generate()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(JobStatus::NotFound).unwrap(),
            serde_json::json!("not_found")
        );
        assert_eq!(JobStatus::Downloading.to_string(), "downloading");
    }

    #[test]
    fn transitions_only_move_forward() {
        assert!(JobStatus::Queued.can_transition_to(JobStatus::Downloading));
        assert!(JobStatus::Downloading.can_transition_to(JobStatus::Completed));
        assert!(JobStatus::Downloading.can_transition_to(JobStatus::Error));
        assert!(!JobStatus::Downloading.can_transition_to(JobStatus::Queued));
        assert!(!JobStatus::Completed.can_transition_to(JobStatus::Error));
        assert!(!JobStatus::Error.can_transition_to(JobStatus::Completed));
        assert!(JobStatus::Queued.can_transition_to(JobStatus::Error));
        assert!(!JobStatus::Queued.can_transition_to(JobStatus::Completed));
        assert!(!JobStatus::Queued.can_transition_to(JobStatus::NotFound));
    }

    #[test]
    fn progress_never_decreases_while_downloading() {
        let mut job = sample_job();
        assert!(job.begin());
        job.set_stage("Downloading...", SETUP_PROGRESS);
        job.apply_tracks(TrackProgress {
            current_track: 2,
            total_tracks: 5,
            progress: 55,
        });
        assert_eq!(job.progress, 55);

        // Total revised upward lowers the computed percentage; stored progress holds.
        job.apply_tracks(TrackProgress {
            current_track: 2,
            total_tracks: 10,
            progress: 40,
        });
        assert_eq!(job.progress, 55);
        assert_eq!(job.total_tracks, Some(10));
    }

    #[test]
    fn track_change_refreshes_message() {
        let mut job = sample_job();
        job.begin();
        job.apply_tracks(TrackProgress {
            current_track: 1,
            total_tracks: 4,
            progress: 43,
        });
        assert_eq!(job.message, "Downloading track 1/4");
        assert_eq!(job.current_track, Some(1));
    }

    #[test]
    fn overrun_total_is_left_out_of_message() {
        let overrun = TrackProgress {
            current_track: 2,
            total_tracks: 1,
            progress: 40,
        };
        assert_eq!(overrun.message(), "Downloading track 2");

        let unknown = TrackProgress {
            current_track: 3,
            total_tracks: 0,
            progress: 40,
        };
        assert_eq!(unknown.message(), "Downloading track 3");
    }

    #[test]
    fn failure_resets_progress_and_is_absorbing() {
        let mut job = sample_job();
        job.begin();
        job.set_stage("Downloading...", 60);
        assert!(job.fail("download failed: boom"));
        assert_eq!(job.status, JobStatus::Error);
        assert_eq!(job.progress, 0);

        assert!(!job.complete(Path::new("/music")));
        assert_eq!(job.status, JobStatus::Error);
        assert!(!job.begin());
    }

    #[test]
    fn complete_requires_downloading() {
        let mut job = sample_job();
        assert!(!job.complete(Path::new("/music")));
        assert_eq!(job.status, JobStatus::Queued);

        job.begin();
        assert!(job.complete(Path::new("/music/Artist/Album")));
        assert_eq!(job.progress, COMPLETE_PROGRESS);
        assert_eq!(
            job.result_path.as_deref(),
            Some(Path::new("/music/Artist/Album"))
        );
    }

    #[test]
    fn serialized_job_carries_request_fields() {
        let job = sample_job();
        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(json["status"], "queued");
        assert_eq!(json["type"], "album");
        assert_eq!(json["format"], "mp3");
        assert_eq!(json["progress"], 0);
        assert!(json.get("result_path").is_none());
    }
}
