use async_trait::async_trait;

/// Outcome of a successful token refresh. `expires_in_secs` counts from the
/// moment the refresh response was received.
#[derive(Debug, Clone)]
pub struct RefreshedToken {
    pub access_token: String,
    pub expires_in_secs: u64,
}

/// Mints a fresh short-lived access token from a long-lived refresh
/// credential. Implementations carry their own app key/secret.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self) -> Result<RefreshedToken, CredentialError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("remote storage credentials not configured")]
    NotConfigured,
    #[error("token refresh rejected: {0}")]
    RefreshRejected(String),
    #[error("token refresh failed: {0}")]
    RefreshFailed(String),
    #[error("static access token cannot be refreshed")]
    RefreshUnavailable,
}
