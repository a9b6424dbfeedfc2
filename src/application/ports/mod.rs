mod article_extractor;
mod credentials;
mod document_renderer;
mod job_store;
mod job_store_error;
mod remote_store;

pub use article_extractor::{ArticleExtractor, ExtractorError};
pub use credentials::{CredentialError, RefreshedToken, TokenRefresher};
pub use document_renderer::{DocumentRenderer, RenderError};
pub use job_store::{JobPatch, JobStore};
pub use job_store_error::JobStoreError;
pub use remote_store::{RemoteStore, RemoteStoreError};
