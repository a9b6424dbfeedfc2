use std::io;
use std::path::Path;

use async_trait::async_trait;

/// Remote storage operations used by the upload stage. Every call takes the
/// access token explicitly; credential caching and refresh live elsewhere.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Creates `path` if missing. An already-existing folder is success,
    /// including when a concurrent job created it first.
    async fn ensure_folder(&self, access_token: &str, path: &str) -> Result<(), RemoteStoreError>;

    /// Uploads `local_path` to `remote_path`, overwriting any previous file.
    async fn upload(
        &self,
        access_token: &str,
        local_path: &Path,
        remote_path: &str,
    ) -> Result<(), RemoteStoreError>;

    /// Returns a shared link for `remote_path`, reusing an existing link
    /// when one was already created.
    async fn shared_link(
        &self,
        access_token: &str,
        remote_path: &str,
    ) -> Result<String, RemoteStoreError>;
}

/// `Auth` is kept separate from `Api` so the upload stage can tell an
/// expired/invalid token apart from any other remote failure.
#[derive(Debug, thiserror::Error)]
pub enum RemoteStoreError {
    #[error("authentication rejected: {0}")]
    Auth(String),
    #[error("api error: {0}")]
    Api(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
