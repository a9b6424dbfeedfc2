use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::ports::{JobStore, JobStoreError};
use crate::domain::{Job, JobId};

/// Request-path side of the orchestrator: creates the job record, hands the
/// id to the worker pool and answers status queries. Never waits on
/// pipeline execution.
pub struct ConversionService {
    job_store: Arc<dyn JobStore>,
    sender: mpsc::Sender<JobId>,
}

impl ConversionService {
    pub fn new(job_store: Arc<dyn JobStore>, sender: mpsc::Sender<JobId>) -> Self {
        Self { job_store, sender }
    }

    pub async fn submit(
        &self,
        url: String,
        title: Option<String>,
        upload_requested: bool,
    ) -> Result<Job, SubmitError> {
        let job = Job::new(url, title, upload_requested);
        self.job_store.create(&job).await?;

        if let Err(e) = self.sender.try_send(job.id) {
            tracing::warn!(job_id = %job.id, error = %e, "Dispatch failed, rejecting submission");
            // Leave no orphan pending record behind a rejected submission.
            if let Err(del) = self.job_store.delete(job.id).await {
                tracing::error!(job_id = %job.id, error = %del, "Cleanup of undispatched job failed");
            }
            return Err(SubmitError::QueueFull);
        }

        tracing::info!(job_id = %job.id, url = %job.url, "Conversion job accepted");
        Ok(job)
    }

    pub async fn status(&self, id: JobId) -> Result<Option<Job>, JobStoreError> {
        self.job_store.get(id).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("conversion queue is full")]
    QueueFull,
    #[error("job store: {0}")]
    Store(#[from] JobStoreError),
}
