use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::application::ports::{JobPatch, JobStore, JobStoreError};
use crate::domain::{Job, JobId, JobStatus};

/// Job store backed by a process-local map. Readers clone the record under
/// the read lock; writers validate and apply a patch in one short critical
/// section. No durability beyond process lifetime, by contract.
pub struct InMemoryJobStore {
    jobs: RwLock<HashMap<JobId, Job>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryJobStore {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_transition(from: JobStatus, to: JobStatus) -> Result<(), JobStoreError> {
    use JobStatus::{Completed, Failed, Pending, Processing};
    let allowed = matches!(
        (from, to),
        (Pending, Pending)
            | (Pending, Processing)
            | (Pending, Failed)
            | (Processing, Processing)
            | (Processing, Completed)
            | (Processing, Failed)
    );
    if allowed {
        Ok(())
    } else {
        Err(JobStoreError::InvalidTransition { from, to })
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn create(&self, job: &Job) -> Result<(), JobStoreError> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&job.id) {
            return Err(JobStoreError::DuplicateId(job.id));
        }
        jobs.insert(job.id, job.clone());
        Ok(())
    }

    async fn get(&self, id: JobId) -> Result<Option<Job>, JobStoreError> {
        let jobs = self.jobs.read().await;
        Ok(jobs.get(&id).cloned())
    }

    async fn update(&self, id: JobId, patch: JobPatch) -> Result<Job, JobStoreError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(&id).ok_or(JobStoreError::NotFound(id))?;

        // Terminal records are frozen; nothing may be rewritten on them.
        if job.status.is_terminal() {
            return Err(JobStoreError::InvalidTransition {
                from: job.status,
                to: patch.status.unwrap_or(job.status),
            });
        }
        if let Some(next) = patch.status {
            validate_transition(job.status, next)?;
            if next.is_terminal() {
                job.completed_at = Some(Utc::now());
            }
            job.status = next;
        }
        if let Some(title) = patch.title {
            job.title = Some(title);
        }
        if let Some(path) = patch.artifact_path {
            job.artifact_path = Some(path);
        }
        if let Some(path) = patch.remote_path {
            job.remote_path = Some(path);
        }
        if let Some(error) = patch.error {
            job.error = Some(error);
        }
        job.updated_at = Utc::now();
        Ok(job.clone())
    }

    async fn delete(&self, id: JobId) -> Result<bool, JobStoreError> {
        let mut jobs = self.jobs.write().await;
        Ok(jobs.remove(&id).is_some())
    }

    async fn prune_terminal_older_than(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<usize, JobStoreError> {
        let mut jobs = self.jobs.write().await;
        let before = jobs.len();
        jobs.retain(|_, job| !(job.status.is_terminal() && job.updated_at < cutoff));
        Ok(before - jobs.len())
    }
}
