//! Per-job download pipeline.
//!
//! The worker operates on a value-type [`DownloadJob`] and cloned
//! dependencies, and reaches shared state only through the [`JobStore`].
//! It returns the finished directory or a [`JobError`]; turning that error
//! into a failed job record is the manager's job.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use albumdl_core::{
    AlbumRequest, COVER_ART_PROGRESS, CommandRunner, CoreError, JobId, PathError, RunnerError,
    SETUP_PROGRESS, Settings, TrackProgress, album_directory, ensure_directory,
};

use super::commands::ToolConfig;
use crate::progress::apply_line;
use crate::store::JobStore;

/// Lines buffered between the downloader's stdout and the parser.
const LINE_BUFFER: usize = 256;

/// Why a job ended in `error`. The `Display` text becomes the job message.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("Failed to create download directory: {0}")]
    Directory(#[from] PathError),

    #[error("download failed: {0}")]
    DownloadFailed(String),

    #[error("download failed: {0}")]
    Runner(#[from] RunnerError),

    #[error(transparent)]
    Store(#[from] CoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Dependencies shared by all workers.
#[derive(Clone)]
pub struct WorkerDeps {
    pub store: JobStore,
    pub runner: Arc<dyn CommandRunner>,
    pub tools: ToolConfig,
}

/// Everything one job needs, fixed at submission time.
#[derive(Debug, Clone)]
pub struct DownloadJob {
    pub id: JobId,
    pub request: AlbumRequest,
    /// Settings snapshot; later updates never reach a submitted job.
    pub settings: Settings,
}

/// Run one job from directory setup to `completed`.
///
/// 1. Create the target directory
/// 2. Stream the downloader, folding each stdout line into the job
/// 3. Run the cover-art fixer (failure is logged, not fatal)
/// 4. Mark the job completed with its result directory
pub async fn run_job(job: DownloadJob, deps: &WorkerDeps) -> Result<PathBuf, JobError> {
    let target = album_directory(&job.settings.download_path, &job.request);
    ensure_directory(&target).await?;

    deps.store
        .update(&job.id, |j| {
            j.begin();
        })
        .await?;
    deps.store
        .update(&job.id, |j| {
            j.set_stage("Downloading...", SETUP_PROGRESS);
        })
        .await?;

    info!(
        target: "albumdl.job",
        id = %job.id,
        url = %job.request.url,
        dir = %target.display(),
        format = %job.settings.audio_format,
        "Starting download"
    );

    let spec = deps
        .tools
        .download_command(&job.request.url, &target, &job.settings.audio_format);
    let (tx, rx) = mpsc::channel(LINE_BUFFER);
    let (output, ()) = tokio::join!(
        deps.runner.run_streaming(&spec, tx),
        consume_lines(&deps.store, &job.id, rx)
    );
    let output = output?;
    if !output.success() {
        return Err(JobError::DownloadFailed(output.diagnostic()));
    }

    deps.store
        .update(&job.id, |j| {
            j.set_stage("Fixing cover art...", COVER_ART_PROGRESS);
        })
        .await?;
    fix_cover_art(&job.id, &target, deps).await;

    deps.store
        .update(&job.id, |j| {
            j.complete(&target);
        })
        .await?;

    info!(target: "albumdl.job", id = %job.id, dir = %target.display(), "Download completed");
    Ok(target)
}

/// Fold streamed downloader lines into the job until the sender closes.
async fn consume_lines(store: &JobStore, id: &JobId, mut rx: mpsc::Receiver<String>) {
    let mut tracks = TrackProgress::starting();

    while let Some(line) = rx.recv().await {
        trace!(target: "albumdl.process", id = %id, line = %line, "downloader output");

        let next = apply_line(&tracks, &line);
        if next == tracks {
            continue;
        }
        tracks = next;

        let applied = store
            .update(id, |j| {
                j.apply_tracks(tracks);
            })
            .await;
        match applied {
            Ok(_) => debug!(
                target: "albumdl.job",
                id = %id,
                current = tracks.current_track,
                total = tracks.total_tracks,
                progress = tracks.progress,
                "Track progress"
            ),
            Err(e) => {
                warn!(target: "albumdl.job", id = %id, error = %e, "Dropping progress update");
            }
        }
    }
}

async fn fix_cover_art(id: &JobId, target: &Path, deps: &WorkerDeps) {
    let spec = deps.tools.cover_art_command(target);
    match deps.runner.run(&spec).await {
        Ok(output) if output.success() => {
            debug!(target: "albumdl.job", id = %id, "Cover art fixed");
        }
        Ok(output) => {
            warn!(
                target: "albumdl.job",
                id = %id,
                reason = %output.diagnostic(),
                "Cover art fix failed, completing anyway"
            );
        }
        Err(e) => {
            warn!(
                target: "albumdl.job",
                id = %id,
                error = %e,
                "Cover art fixer could not run, completing anyway"
            );
        }
    }
}
