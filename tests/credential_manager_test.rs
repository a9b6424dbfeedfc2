use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use paperpress::application::ports::{CredentialError, RefreshedToken, TokenRefresher};
use paperpress::application::services::CredentialManager;

const TEST_MARGIN_SECS: u64 = 60;

/// Counts refresh calls and hands out sequentially numbered tokens.
struct CountingRefresher {
    calls: AtomicUsize,
    delay: Duration,
    expires_in_secs: u64,
}

impl CountingRefresher {
    fn new(expires_in_secs: u64) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
            expires_in_secs,
        }
    }

    fn slow(expires_in_secs: u64, delay: Duration) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            delay,
            expires_in_secs,
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl TokenRefresher for CountingRefresher {
    async fn refresh(&self) -> Result<RefreshedToken, CredentialError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(RefreshedToken {
            access_token: format!("token-{}", n),
            expires_in_secs: self.expires_in_secs,
        })
    }
}

/// Fails a configured number of times before starting to succeed.
struct FlakyRefresher {
    calls: AtomicUsize,
    failures: usize,
}

#[async_trait::async_trait]
impl TokenRefresher for FlakyRefresher {
    async fn refresh(&self) -> Result<RefreshedToken, CredentialError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n < self.failures {
            Err(CredentialError::RefreshFailed(
                "token endpoint unreachable".to_string(),
            ))
        } else {
            Ok(RefreshedToken {
                access_token: format!("token-{}", n),
                expires_in_secs: 14_400,
            })
        }
    }
}

#[tokio::test]
async fn given_static_token_when_requested_then_returned_without_refresh() {
    let manager = CredentialManager::with_static_token("long-lived".to_string());

    assert_eq!(manager.get_valid_token().await.unwrap(), "long-lived");
    assert_eq!(manager.get_valid_token().await.unwrap(), "long-lived");
}

#[tokio::test]
async fn given_static_token_when_rejected_then_refresh_is_unavailable() {
    let manager = CredentialManager::with_static_token("long-lived".to_string());

    let err = manager.refresh_after_rejection("long-lived").await.unwrap_err();
    assert!(matches!(err, CredentialError::RefreshUnavailable));
}

#[tokio::test]
async fn given_no_credentials_when_requested_then_not_configured() {
    let manager = CredentialManager::unconfigured();

    let err = manager.get_valid_token().await.unwrap_err();
    assert!(matches!(err, CredentialError::NotConfigured));
}

#[tokio::test]
async fn given_fresh_cached_token_when_requested_again_then_no_second_refresh() {
    let refresher = Arc::new(CountingRefresher::new(14_400));
    let manager =
        CredentialManager::with_refresher(Arc::clone(&refresher) as _, TEST_MARGIN_SECS);

    let first = manager.get_valid_token().await.unwrap();
    let second = manager.get_valid_token().await.unwrap();

    assert_eq!(first, "token-0");
    assert_eq!(second, "token-0");
    assert_eq!(refresher.call_count(), 1);
}

#[tokio::test]
async fn given_token_expiring_within_margin_when_requested_then_refreshed_early() {
    // 30s of lifetime is inside the 60s safety margin, so the cached token
    // must not be reused.
    let refresher = Arc::new(CountingRefresher::new(30));
    let manager =
        CredentialManager::with_refresher(Arc::clone(&refresher) as _, TEST_MARGIN_SECS);

    let first = manager.get_valid_token().await.unwrap();
    let second = manager.get_valid_token().await.unwrap();

    assert_eq!(first, "token-0");
    assert_eq!(second, "token-1");
    assert_eq!(refresher.call_count(), 2);
}

#[tokio::test]
async fn given_fifty_concurrent_callers_when_cache_empty_then_exactly_one_refresh() {
    let refresher = Arc::new(CountingRefresher::slow(
        14_400,
        Duration::from_millis(50),
    ));
    let manager = Arc::new(CredentialManager::with_refresher(
        Arc::clone(&refresher) as _,
        TEST_MARGIN_SECS,
    ));

    let mut handles = Vec::new();
    for _ in 0..50 {
        let manager = Arc::clone(&manager);
        handles.push(tokio::spawn(
            async move { manager.get_valid_token().await },
        ));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), "token-0");
    }
    assert_eq!(refresher.call_count(), 1);
}

#[tokio::test]
async fn given_failed_refresh_when_retried_then_next_attempt_succeeds() {
    let refresher = Arc::new(FlakyRefresher {
        calls: AtomicUsize::new(0),
        failures: 1,
    });
    let manager =
        CredentialManager::with_refresher(Arc::clone(&refresher) as _, TEST_MARGIN_SECS);

    let err = manager.get_valid_token().await.unwrap_err();
    assert!(matches!(err, CredentialError::RefreshFailed(_)));

    // The failure left no poisoned state behind.
    assert_eq!(manager.get_valid_token().await.unwrap(), "token-1");
}

#[tokio::test]
async fn given_rejected_token_when_cache_unchanged_then_new_token_minted() {
    let refresher = Arc::new(CountingRefresher::new(14_400));
    let manager =
        CredentialManager::with_refresher(Arc::clone(&refresher) as _, TEST_MARGIN_SECS);

    let token = manager.get_valid_token().await.unwrap();
    let reminted = manager.refresh_after_rejection(&token).await.unwrap();

    assert_eq!(reminted, "token-1");
    assert_eq!(refresher.call_count(), 2);
}

#[tokio::test]
async fn given_rejected_token_when_cache_already_replaced_then_cached_token_reused() {
    let refresher = Arc::new(CountingRefresher::new(14_400));
    let manager =
        CredentialManager::with_refresher(Arc::clone(&refresher) as _, TEST_MARGIN_SECS);

    // Cache now holds token-0; a caller reporting some older token must get
    // the cached one back without a fresh mint.
    manager.get_valid_token().await.unwrap();
    let token = manager
        .refresh_after_rejection("token-from-last-week")
        .await
        .unwrap();

    assert_eq!(token, "token-0");
    assert_eq!(refresher.call_count(), 1);
}
