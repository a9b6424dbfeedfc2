use std::path::Path;
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tracing::Instrument;

use crate::application::ports::{
    ArticleExtractor, CredentialError, DocumentRenderer, JobPatch, JobStore, JobStoreError,
    RemoteStore, RemoteStoreError,
};
use crate::application::services::pipeline::{run_stage, PipelineConfig, StageError};
use crate::application::services::{artifact, CredentialManager};
use crate::domain::{Job, JobId, JobStatus, Stage};

/// One worker of the conversion pool. Workers share a single receiver; the
/// receiver mutex is held only for `recv`, never while a job is processed.
pub struct ConversionWorker {
    worker_id: usize,
    receiver: Arc<Mutex<mpsc::Receiver<JobId>>>,
    job_store: Arc<dyn JobStore>,
    extractor: Arc<dyn ArticleExtractor>,
    renderer: Arc<dyn DocumentRenderer>,
    remote_store: Arc<dyn RemoteStore>,
    credentials: Arc<CredentialManager>,
    config: PipelineConfig,
}

impl ConversionWorker {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        worker_id: usize,
        receiver: Arc<Mutex<mpsc::Receiver<JobId>>>,
        job_store: Arc<dyn JobStore>,
        extractor: Arc<dyn ArticleExtractor>,
        renderer: Arc<dyn DocumentRenderer>,
        remote_store: Arc<dyn RemoteStore>,
        credentials: Arc<CredentialManager>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            worker_id,
            receiver,
            job_store,
            extractor,
            renderer,
            remote_store,
            credentials,
            config,
        }
    }

    pub async fn run(self) {
        tracing::info!(worker = self.worker_id, "Conversion worker started");
        loop {
            let job_id = {
                let mut receiver = self.receiver.lock().await;
                receiver.recv().await
            };
            let Some(job_id) = job_id else { break };

            let span = tracing::info_span!(
                "conversion_job",
                job_id = %job_id.as_uuid(),
                worker = self.worker_id,
            );
            async {
                if let Err(e) = self.process_job(job_id).await {
                    tracing::error!(error = %e, "Conversion job aborted");
                }
            }
            .instrument(span)
            .await;
        }
        tracing::info!(worker = self.worker_id, "Conversion worker stopped: channel closed");
    }

    /// Claims the job, runs the pipeline and lands the record on a terminal
    /// state. A stage failure is recorded on the job; only store failures
    /// propagate out of here.
    async fn process_job(&self, job_id: JobId) -> Result<(), ConversionWorkerError> {
        let Some(job) = self.job_store.get(job_id).await.map_err(ConversionWorkerError::Store)? else {
            tracing::warn!("Job vanished before processing");
            return Ok(());
        };

        self.update(job_id, JobPatch::status(JobStatus::Processing))
            .await?;
        tracing::info!(url = %job.url, "Conversion started");

        match self.run_pipeline(&job).await {
            Ok(()) => {
                self.update(job_id, JobPatch::status(JobStatus::Completed))
                    .await?;
                tracing::info!("Conversion completed");
            }
            Err(ConversionWorkerError::Stage(stage_error)) => {
                let message = stage_error.to_string();
                tracing::warn!(error = %message, "Conversion failed");
                self.update(job_id, JobPatch::failed(message)).await?;
            }
            Err(store_error) => return Err(store_error),
        }

        Ok(())
    }

    async fn run_pipeline(&self, job: &Job) -> Result<(), ConversionWorkerError> {
        let timeouts = &self.config.timeouts;

        let mut article = run_stage(
            Stage::Extraction,
            timeouts.extraction,
            self.extractor.extract(&job.url),
        )
        .await?;
        tracing::debug!(title = %article.title, "Article extracted");

        // A caller-supplied title wins; otherwise the extracted one is
        // committed to the record so the client sees it while polling.
        match &job.title {
            Some(title) => article.title = title.clone(),
            None => {
                self.update(job.id, JobPatch::default().with_title(article.title.clone()))
                    .await?;
            }
        }

        let filename = artifact::pdf_filename(&article.title);
        let job_dir = self.config.temp_dir.join(job.id.to_string());
        if let Err(e) = tokio::fs::create_dir_all(&job_dir).await {
            return Err(StageError {
                stage: Stage::Rendering,
                cause: format!("cannot create artifact directory: {}", e),
            }
            .into());
        }
        let output_path = job_dir.join(&filename);

        run_stage(
            Stage::Rendering,
            timeouts.rendering,
            self.renderer.render(&article, &output_path),
        )
        .await?;
        self.update(
            job.id,
            JobPatch::default().with_artifact_path(output_path.display().to_string()),
        )
        .await?;

        if job.upload_requested {
            let remote_path = run_stage(
                Stage::Upload,
                timeouts.upload,
                self.upload_artifact(&output_path, &filename),
            )
            .await?;
            self.update(job.id, JobPatch::default().with_remote_path(remote_path))
                .await?;
        }

        Ok(())
    }

    /// Upload stage body: mint a token, push the artifact, and on an auth
    /// rejection re-mint once and retry. A second rejection or a failed
    /// re-mint fails the stage.
    async fn upload_artifact(&self, local: &Path, filename: &str) -> Result<String, UploadError> {
        let remote_path = artifact::remote_path(&self.config.remote_folder, filename);

        let mut token = self.credentials.get_valid_token().await?;
        if let Err(e) = self.push_to_remote(&token, local, &remote_path).await {
            match e {
                RemoteStoreError::Auth(reason) => {
                    tracing::warn!(reason = %reason, "Access token rejected by remote storage, re-minting");
                    token = self.credentials.refresh_after_rejection(&token).await?;
                    self.push_to_remote(&token, local, &remote_path).await?;
                }
                other => return Err(other.into()),
            }
        }

        if self.config.create_shared_link {
            match self.remote_store.shared_link(&token, &remote_path).await {
                Ok(link) => tracing::info!(link = %link, "Shared link ready"),
                Err(e) => tracing::warn!(error = %e, "Shared link creation failed"),
            }
        }

        Ok(remote_path)
    }

    async fn push_to_remote(
        &self,
        token: &str,
        local: &Path,
        remote_path: &str,
    ) -> Result<(), RemoteStoreError> {
        self.remote_store
            .ensure_folder(token, &self.config.remote_folder)
            .await?;
        self.remote_store.upload(token, local, remote_path).await
    }

    async fn update(&self, job_id: JobId, patch: JobPatch) -> Result<Job, ConversionWorkerError> {
        if let Some(status) = patch.status {
            tracing::debug!(status = %status, "Job status transition");
        }
        self.job_store
            .update(job_id, patch)
            .await
            .map_err(ConversionWorkerError::Store)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConversionWorkerError {
    #[error("{0}")]
    Stage(#[from] StageError),
    #[error("job store: {0}")]
    Store(JobStoreError),
}

#[derive(Debug, thiserror::Error)]
enum UploadError {
    #[error("{0}")]
    Credential(#[from] CredentialError),
    #[error("{0}")]
    Remote(#[from] RemoteStoreError),
}
