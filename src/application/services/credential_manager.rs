use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::application::ports::{CredentialError, TokenRefresher};

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

enum Mode {
    /// Short-lived tokens minted through a refresher.
    Refresh(Arc<dyn TokenRefresher>),
    /// A long-lived token handed out as-is; no expiry bookkeeping.
    Static(String),
    Unconfigured,
}

/// Owns the remote-storage access token and its refresh protocol.
///
/// The cache mutex is deliberately held across the refresh call: callers
/// arriving while a refresh is in flight queue on the lock and then take
/// the fresh-token fast path, so concurrent expiry never issues more than
/// one refresh (some OAuth providers invalidate the previous token on each
/// refresh, which makes racing refreshes destructive).
pub struct CredentialManager {
    mode: Mode,
    margin: chrono::Duration,
    cache: Mutex<Option<CachedToken>>,
}

impl CredentialManager {
    pub fn with_refresher(refresher: Arc<dyn TokenRefresher>, margin_secs: u64) -> Self {
        Self {
            mode: Mode::Refresh(refresher),
            margin: chrono::Duration::seconds(margin_secs as i64),
            cache: Mutex::new(None),
        }
    }

    pub fn with_static_token(access_token: String) -> Self {
        Self {
            mode: Mode::Static(access_token),
            margin: chrono::Duration::zero(),
            cache: Mutex::new(None),
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            mode: Mode::Unconfigured,
            margin: chrono::Duration::zero(),
            cache: Mutex::new(None),
        }
    }

    /// Returns a token expected to stay valid past the safety margin,
    /// refreshing first when the cached one is missing or expiring.
    pub async fn get_valid_token(&self) -> Result<String, CredentialError> {
        match &self.mode {
            Mode::Static(token) => Ok(token.clone()),
            Mode::Unconfigured => Err(CredentialError::NotConfigured),
            Mode::Refresh(refresher) => {
                let mut cache = self.cache.lock().await;
                if let Some(cached) = cache.as_ref() {
                    if cached.expires_at - self.margin > Utc::now() {
                        return Ok(cached.access_token.clone());
                    }
                }
                mint(refresher.as_ref(), &mut cache).await
            }
        }
    }

    /// Re-mints after the remote side rejected `rejected` as expired or
    /// invalid. If another caller already replaced it, the newer token is
    /// returned without a second refresh.
    pub async fn refresh_after_rejection(
        &self,
        rejected: &str,
    ) -> Result<String, CredentialError> {
        match &self.mode {
            Mode::Static(_) => Err(CredentialError::RefreshUnavailable),
            Mode::Unconfigured => Err(CredentialError::NotConfigured),
            Mode::Refresh(refresher) => {
                let mut cache = self.cache.lock().await;
                if let Some(cached) = cache.as_ref() {
                    if cached.access_token != rejected {
                        return Ok(cached.access_token.clone());
                    }
                }
                mint(refresher.as_ref(), &mut cache).await
            }
        }
    }
}

/// Cache is written only after a fully successful refresh; a failed one
/// leaves the previous state in place for the next attempt.
async fn mint(
    refresher: &dyn TokenRefresher,
    cache: &mut Option<CachedToken>,
) -> Result<String, CredentialError> {
    let fresh = refresher.refresh().await?;
    let expires_at = Utc::now() + chrono::Duration::seconds(fresh.expires_in_secs as i64);
    tracing::debug!(expires_at = %expires_at, "Access token refreshed");
    *cache = Some(CachedToken {
        access_token: fresh.access_token.clone(),
        expires_at,
    });
    Ok(fresh.access_token)
}
