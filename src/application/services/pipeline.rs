use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::Stage;

/// Failure of one pipeline stage. The display form (`"<stage>: <cause>"`)
/// is exactly what lands in `Job::error`.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{stage}: {cause}")]
pub struct StageError {
    pub stage: Stage,
    pub cause: String,
}

#[derive(Debug, Clone, Copy)]
pub struct StageTimeouts {
    pub extraction: Duration,
    pub rendering: Duration,
    pub upload: Duration,
}

impl Default for StageTimeouts {
    fn default() -> Self {
        Self {
            extraction: Duration::from_secs(30),
            rendering: Duration::from_secs(60),
            upload: Duration::from_secs(30),
        }
    }
}

/// Pipeline settings shared by every worker in the pool.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub timeouts: StageTimeouts,
    pub temp_dir: PathBuf,
    pub remote_folder: String,
    pub create_shared_link: bool,
}

/// Runs one stage under its deadline, translating both a timeout and a
/// collaborator error into a [`StageError`] tagged with the stage name.
pub async fn run_stage<T, E, F>(stage: Stage, limit: Duration, work: F) -> Result<T, StageError>
where
    E: fmt::Display,
    F: Future<Output = Result<T, E>>,
{
    match tokio::time::timeout(limit, work).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(cause)) => Err(StageError {
            stage,
            cause: cause.to_string(),
        }),
        Err(_) => Err(StageError {
            stage,
            cause: format!("timed out after {}s", limit.as_secs()),
        }),
    }
}
