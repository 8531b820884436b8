//! In-memory job store.
//!
//! The single shared mutable structure of the engine. Every operation takes
//! the lock for the duration of one map access or one mutator call, never
//! across a subprocess await, so readers always see a whole job record.
//! Entries live for the whole process; nothing is evicted.

use std::sync::Arc;

use indexmap::IndexMap;
use tokio::sync::RwLock;

use albumdl_core::{CoreError, Job, JobId};

/// Concurrent-safe map from job id to job record, in creation order.
#[derive(Debug, Clone, Default)]
pub struct JobStore {
    jobs: Arc<RwLock<IndexMap<JobId, Job>>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new job. Ids are never reused.
    pub async fn create(&self, job: Job) -> Result<(), CoreError> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&job.id) {
            return Err(CoreError::AlreadyExists(format!("job {}", job.id)));
        }
        jobs.insert(job.id.clone(), job);
        Ok(())
    }

    /// Snapshot of one job.
    pub async fn get(&self, id: &JobId) -> Option<Job> {
        self.jobs.read().await.get(id).cloned()
    }

    /// Mutate a job in place and return the resulting snapshot.
    ///
    /// The mutator runs under the write lock and must not block.
    pub async fn update<F>(&self, id: &JobId, mutate: F) -> Result<Job, CoreError>
    where
        F: FnOnce(&mut Job),
    {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .get_mut(id)
            .ok_or_else(|| CoreError::NotFound(format!("job {id}")))?;
        mutate(job);
        job.touch();
        Ok(job.clone())
    }

    /// Snapshot of every job, oldest first.
    pub async fn list(&self) -> IndexMap<JobId, Job> {
        self.jobs.read().await.clone()
    }
}
