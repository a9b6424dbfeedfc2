use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::MissedTickBehavior;

use crate::application::ports::JobStore;

/// Periodically drops terminal jobs older than `retention`. Keeps the
/// in-memory store from growing without bound; pending and processing jobs
/// are never touched.
pub async fn run_retention_janitor(
    job_store: Arc<dyn JobStore>,
    retention: chrono::Duration,
    period: Duration,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        let cutoff = Utc::now() - retention;
        match job_store.prune_terminal_older_than(cutoff).await {
            Ok(0) => {}
            Ok(pruned) => tracing::info!(pruned, "Removed expired jobs"),
            Err(e) => tracing::warn!(error = %e, "Job pruning failed"),
        }
    }
}
