use std::sync::Arc;

use chrono::Utc;

use paperpress::application::ports::{JobPatch, JobStore, JobStoreError};
use paperpress::domain::{Job, JobStatus};
use paperpress::infrastructure::persistence::InMemoryJobStore;

fn pending_job() -> Job {
    Job::new("https://example.com/article".to_string(), None, false)
}

#[tokio::test]
async fn given_created_job_when_fetched_then_record_matches() {
    let store = InMemoryJobStore::new();
    let job = Job::new(
        "https://example.com/article".to_string(),
        Some("A Title".to_string()),
        true,
    );

    store.create(&job).await.unwrap();
    let fetched = store.get(job.id).await.unwrap().unwrap();

    assert_eq!(fetched.id, job.id);
    assert_eq!(fetched.url, job.url);
    assert_eq!(fetched.title.as_deref(), Some("A Title"));
    assert!(fetched.upload_requested);
    assert_eq!(fetched.status, JobStatus::Pending);
    assert!(fetched.artifact_path.is_none());
    assert!(fetched.completed_at.is_none());
}

#[tokio::test]
async fn given_unknown_id_when_fetched_then_returns_none() {
    let store = InMemoryJobStore::new();
    let missing = pending_job();

    assert!(store.get(missing.id).await.unwrap().is_none());
}

#[tokio::test]
async fn given_existing_id_when_created_again_then_rejected() {
    let store = InMemoryJobStore::new();
    let job = pending_job();
    store.create(&job).await.unwrap();

    let err = store.create(&job).await.unwrap_err();
    assert!(matches!(err, JobStoreError::DuplicateId(id) if id == job.id));
}

#[tokio::test]
async fn given_pending_job_when_driven_to_completed_then_timestamps_stamped() {
    let store = InMemoryJobStore::new();
    let job = pending_job();
    store.create(&job).await.unwrap();

    let processing = store
        .update(job.id, JobPatch::status(JobStatus::Processing))
        .await
        .unwrap();
    assert_eq!(processing.status, JobStatus::Processing);
    assert!(processing.completed_at.is_none());

    let completed = store
        .update(job.id, JobPatch::status(JobStatus::Completed))
        .await
        .unwrap();
    assert_eq!(completed.status, JobStatus::Completed);
    assert!(completed.completed_at.is_some());
    assert!(completed.updated_at >= completed.created_at);
}

#[tokio::test]
async fn given_failed_patch_when_applied_then_status_and_error_move_together() {
    let store = InMemoryJobStore::new();
    let job = pending_job();
    store.create(&job).await.unwrap();
    store
        .update(job.id, JobPatch::status(JobStatus::Processing))
        .await
        .unwrap();

    let failed = store
        .update(job.id, JobPatch::failed("extraction: fetch failed".to_string()))
        .await
        .unwrap();

    assert_eq!(failed.status, JobStatus::Failed);
    assert_eq!(failed.error.as_deref(), Some("extraction: fetch failed"));
    assert!(failed.completed_at.is_some());
}

#[tokio::test]
async fn given_pending_job_when_completed_directly_then_transition_rejected() {
    let store = InMemoryJobStore::new();
    let job = pending_job();
    store.create(&job).await.unwrap();

    let err = store
        .update(job.id, JobPatch::status(JobStatus::Completed))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        JobStoreError::InvalidTransition {
            from: JobStatus::Pending,
            to: JobStatus::Completed,
        }
    ));
}

#[tokio::test]
async fn given_processing_job_when_moved_back_to_pending_then_transition_rejected() {
    let store = InMemoryJobStore::new();
    let job = pending_job();
    store.create(&job).await.unwrap();
    store
        .update(job.id, JobPatch::status(JobStatus::Processing))
        .await
        .unwrap();

    let err = store
        .update(job.id, JobPatch::status(JobStatus::Pending))
        .await
        .unwrap_err();
    assert!(matches!(err, JobStoreError::InvalidTransition { .. }));
}

#[tokio::test]
async fn given_terminal_job_when_any_patch_applied_then_record_is_frozen() {
    let store = InMemoryJobStore::new();
    let job = pending_job();
    store.create(&job).await.unwrap();
    store
        .update(job.id, JobPatch::status(JobStatus::Processing))
        .await
        .unwrap();
    store
        .update(job.id, JobPatch::status(JobStatus::Completed))
        .await
        .unwrap();

    // Even a patch without a status change must not touch a terminal record.
    let err = store
        .update(
            job.id,
            JobPatch::default().with_title("Rewritten".to_string()),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, JobStoreError::InvalidTransition { .. }));

    let err = store
        .update(job.id, JobPatch::status(JobStatus::Processing))
        .await
        .unwrap_err();
    assert!(matches!(err, JobStoreError::InvalidTransition { .. }));

    let frozen = store.get(job.id).await.unwrap().unwrap();
    assert_eq!(frozen.status, JobStatus::Completed);
    assert!(frozen.title.is_none());
}

#[tokio::test]
async fn given_field_patch_when_applied_mid_processing_then_status_unchanged() {
    let store = InMemoryJobStore::new();
    let job = pending_job();
    store.create(&job).await.unwrap();
    store
        .update(job.id, JobPatch::status(JobStatus::Processing))
        .await
        .unwrap();

    let updated = store
        .update(
            job.id,
            JobPatch::default().with_artifact_path("/tmp/out/a.pdf".to_string()),
        )
        .await
        .unwrap();

    assert_eq!(updated.status, JobStatus::Processing);
    assert_eq!(updated.artifact_path.as_deref(), Some("/tmp/out/a.pdf"));
}

#[tokio::test]
async fn given_unknown_id_when_updated_then_not_found() {
    let store = InMemoryJobStore::new();
    let ghost = pending_job();

    let err = store
        .update(ghost.id, JobPatch::status(JobStatus::Processing))
        .await
        .unwrap_err();
    assert!(matches!(err, JobStoreError::NotFound(id) if id == ghost.id));
}

#[tokio::test]
async fn given_existing_job_when_deleted_then_gone() {
    let store = InMemoryJobStore::new();
    let job = pending_job();
    store.create(&job).await.unwrap();

    assert!(store.delete(job.id).await.unwrap());
    assert!(store.get(job.id).await.unwrap().is_none());
    assert!(!store.delete(job.id).await.unwrap());
}

#[tokio::test]
async fn given_mixed_jobs_when_pruned_then_only_old_terminal_records_removed() {
    let store = InMemoryJobStore::new();

    let completed = pending_job();
    store.create(&completed).await.unwrap();
    store
        .update(completed.id, JobPatch::status(JobStatus::Processing))
        .await
        .unwrap();
    store
        .update(completed.id, JobPatch::status(JobStatus::Completed))
        .await
        .unwrap();

    let failed = pending_job();
    store.create(&failed).await.unwrap();
    store
        .update(failed.id, JobPatch::failed("extraction: boom".to_string()))
        .await
        .unwrap();

    let pending = pending_job();
    store.create(&pending).await.unwrap();

    // Nothing is old enough yet.
    let pruned = store
        .prune_terminal_older_than(Utc::now() - chrono::Duration::hours(1))
        .await
        .unwrap();
    assert_eq!(pruned, 0);

    // A future cutoff catches both terminal records but never the pending one.
    let pruned = store
        .prune_terminal_older_than(Utc::now() + chrono::Duration::hours(1))
        .await
        .unwrap();
    assert_eq!(pruned, 2);
    assert!(store.get(completed.id).await.unwrap().is_none());
    assert!(store.get(failed.id).await.unwrap().is_none());
    assert!(store.get(pending.id).await.unwrap().is_some());
}

#[tokio::test]
async fn given_concurrent_creates_when_all_settle_then_every_record_present() {
    let store = Arc::new(InMemoryJobStore::new());

    let mut handles = Vec::new();
    for _ in 0..32 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            let job = pending_job();
            store.create(&job).await.unwrap();
            job.id
        }));
    }

    for handle in handles {
        let id = handle.await.unwrap();
        assert!(store.get(id).await.unwrap().is_some());
    }
}
