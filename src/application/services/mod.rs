pub mod artifact;
mod conversion_service;
mod conversion_worker;
mod credential_manager;
mod pipeline;
mod rate_limiter;
mod retention;

pub use conversion_service::{ConversionService, SubmitError};
pub use conversion_worker::{ConversionWorker, ConversionWorkerError};
pub use credential_manager::CredentialManager;
pub use pipeline::{run_stage, PipelineConfig, StageError, StageTimeouts};
pub use rate_limiter::RateLimiter;
pub use retention::run_retention_janitor;
