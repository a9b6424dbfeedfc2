use super::{JobId, JobStatus};
use chrono::{DateTime, Utc};

/// One tracked conversion request, from submission to terminal state.
///
/// The canonical record lives in the job store; workers operate on a
/// transient copy and commit mutations back after each pipeline stage.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub url: String,
    pub title: Option<String>,
    pub upload_requested: bool,
    pub status: JobStatus,
    pub artifact_path: Option<String>,
    pub remote_path: Option<String>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Job {
    pub fn new(url: String, title: Option<String>, upload_requested: bool) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            url,
            title,
            upload_requested,
            status: JobStatus::Pending,
            artifact_path: None,
            remote_path: None,
            error: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }
}
