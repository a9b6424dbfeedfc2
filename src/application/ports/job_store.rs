use crate::domain::{Job, JobId, JobStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::JobStoreError;

/// Partial update applied atomically by [`JobStore::update`]. `None` fields
/// are left untouched; a status change is validated against the transition
/// rules before anything is written.
#[derive(Debug, Clone, Default)]
pub struct JobPatch {
    pub status: Option<JobStatus>,
    pub title: Option<String>,
    pub artifact_path: Option<String>,
    pub remote_path: Option<String>,
    pub error: Option<String>,
}

impl JobPatch {
    pub fn status(status: JobStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Terminal failure: status and error move together so a failed job
    /// always carries its reason.
    pub fn failed(error: String) -> Self {
        Self {
            status: Some(JobStatus::Failed),
            error: Some(error),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: String) -> Self {
        self.title = Some(title);
        self
    }

    pub fn with_artifact_path(mut self, path: String) -> Self {
        self.artifact_path = Some(path);
        self
    }

    pub fn with_remote_path(mut self, path: String) -> Self {
        self.remote_path = Some(path);
        self
    }
}

#[async_trait]
pub trait JobStore: Send + Sync {
    async fn create(&self, job: &Job) -> Result<(), JobStoreError>;

    async fn get(&self, id: JobId) -> Result<Option<Job>, JobStoreError>;

    /// Applies `patch` atomically, bumping `updated_at` and stamping
    /// `completed_at` on a terminal transition. Fails with
    /// [`JobStoreError::InvalidTransition`] when the status change is not
    /// allowed and with [`JobStoreError::NotFound`] for unknown ids.
    async fn update(&self, id: JobId, patch: JobPatch) -> Result<Job, JobStoreError>;

    /// Removes a record. Returns `false` when the id was unknown.
    async fn delete(&self, id: JobId) -> Result<bool, JobStoreError>;

    /// Drops terminal jobs last touched before `cutoff`; returns how many
    /// were removed.
    async fn prune_terminal_older_than(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<usize, JobStoreError>;
}
