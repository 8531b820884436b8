//! Job scheduling.
//!
//! # Architecture
//!
//! - **Manager**: creates job records, snapshots settings and spawns workers
//! - **Worker**: runs one job's pipeline, writing only through the store
//! - **Supervisor**: one lightweight task per job that awaits the worker and
//!   forces the job into `error` if the worker failed or panicked
//!
//! # Concurrency Model
//!
//! - One tokio task per job; `submit` returns as soon as the job is stored
//! - A semaphore caps running jobs; jobs waiting for a permit stay `queued`
//! - Store locks are never held across a subprocess await

mod commands;
mod worker;

use std::any::Any;
use std::sync::Arc;

use indexmap::IndexMap;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use albumdl_core::{AlbumRequest, CommandRunner, CoreError, Job, JobId, SettingsService};

use crate::store::JobStore;

pub use commands::ToolConfig;
pub use worker::{DownloadJob, JobError, WorkerDeps, run_job};

/// Default cap on concurrently running jobs.
pub const DEFAULT_MAX_CONCURRENT_JOBS: usize = 3;

/// Configuration for the job manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobManagerConfig {
    pub tools: ToolConfig,
    /// Jobs allowed to run at once. Zero is treated as one.
    pub max_concurrent_jobs: usize,
}

impl Default for JobManagerConfig {
    fn default() -> Self {
        Self {
            tools: ToolConfig::default(),
            max_concurrent_jobs: DEFAULT_MAX_CONCURRENT_JOBS,
        }
    }
}

/// Accepts download requests and drives them in the background.
pub struct JobManager {
    settings: Arc<SettingsService>,
    deps: WorkerDeps,
    permits: Arc<Semaphore>,
}

impl JobManager {
    pub fn new(
        settings: Arc<SettingsService>,
        runner: Arc<dyn CommandRunner>,
        config: JobManagerConfig,
    ) -> Self {
        let slots = config.max_concurrent_jobs.max(1);
        info!(
            target: "albumdl.job",
            max_concurrent_jobs = slots,
            downloader = %config.tools.downloader,
            "Job manager ready"
        );

        Self {
            settings,
            deps: WorkerDeps {
                store: JobStore::new(),
                runner,
                tools: config.tools,
            },
            permits: Arc::new(Semaphore::new(slots)),
        }
    }

    /// Create a queued job and schedule it. Returns without waiting for
    /// the download.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn submit(&self, request: AlbumRequest) -> Result<JobId, CoreError> {
        let settings = self.settings.snapshot().await;
        let id = JobId::generate();

        self.deps
            .store
            .create(Job::queued(
                id.clone(),
                request.clone(),
                settings.audio_format.clone(),
            ))
            .await?;

        info!(
            target: "albumdl.job",
            id = %id,
            artist = %request.artist,
            album = %request.album,
            kind = ?request.kind,
            "Job queued"
        );

        self.spawn(DownloadJob {
            id: id.clone(),
            request,
            settings,
        });
        Ok(id)
    }

    fn spawn(&self, job: DownloadJob) {
        let id = job.id.clone();
        let deps = self.deps.clone();
        let permits = Arc::clone(&self.permits);

        let worker = tokio::spawn(async move {
            let _permit = permits
                .acquire_owned()
                .await
                .map_err(|e| JobError::Internal(e.to_string()))?;
            run_job(job, &deps).await
        });

        let store = self.deps.store.clone();
        tokio::spawn(async move {
            let reason = match worker.await {
                Ok(Ok(_)) => return,
                Ok(Err(e)) => e.to_string(),
                Err(join) if join.is_panic() => {
                    format!("Internal error: {}", panic_message(join.into_panic().as_ref()))
                }
                Err(_) => "Internal error: job task was cancelled".to_string(),
            };

            error!(target: "albumdl.job", id = %id, reason = %reason, "Job failed");
            let failed = store
                .update(&id, |j| {
                    j.fail(reason);
                })
                .await;
            if let Err(e) = failed {
                warn!(target: "albumdl.job", id = %id, error = %e, "Could not record job failure");
            }
        });
    }

    pub async fn get(&self, id: &JobId) -> Option<Job> {
        self.deps.store.get(id).await
    }

    pub async fn list(&self) -> IndexMap<JobId, Job> {
        self.deps.store.list().await
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "worker panicked".to_string())
}
