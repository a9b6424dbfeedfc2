use std::time::Duration;

use paperpress::application::services::RateLimiter;

#[tokio::test]
async fn given_quota_when_exceeded_then_admission_denied() {
    let limiter = RateLimiter::new(3, Duration::from_secs(60));

    assert!(limiter.admit("10.0.0.1").await);
    assert!(limiter.admit("10.0.0.1").await);
    assert!(limiter.admit("10.0.0.1").await);
    assert!(!limiter.admit("10.0.0.1").await);
}

#[tokio::test]
async fn given_two_clients_when_one_exhausted_then_other_unaffected() {
    let limiter = RateLimiter::new(1, Duration::from_secs(60));

    assert!(limiter.admit("10.0.0.1").await);
    assert!(!limiter.admit("10.0.0.1").await);
    assert!(limiter.admit("10.0.0.2").await);
}

#[tokio::test(start_paused = true)]
async fn given_elapsed_window_when_admitting_then_counter_resets() {
    let limiter = RateLimiter::new(2, Duration::from_secs(60));

    assert!(limiter.admit("client").await);
    assert!(limiter.admit("client").await);
    assert!(!limiter.admit("client").await);

    tokio::time::advance(Duration::from_secs(61)).await;

    assert!(limiter.admit("client").await);
    assert!(limiter.admit("client").await);
    assert!(!limiter.admit("client").await);
}

#[tokio::test(start_paused = true)]
async fn given_window_still_open_when_admitting_then_counter_carries_over() {
    let limiter = RateLimiter::new(2, Duration::from_secs(60));

    assert!(limiter.admit("client").await);
    tokio::time::advance(Duration::from_secs(30)).await;
    assert!(limiter.admit("client").await);
    assert!(!limiter.admit("client").await);

    // The window started 30s ago, so 30 more seconds must pass.
    tokio::time::advance(Duration::from_secs(30)).await;
    assert!(limiter.admit("client").await);
}

#[tokio::test]
async fn given_zero_quota_when_admitting_then_always_denied() {
    let limiter = RateLimiter::new(0, Duration::from_secs(60));

    assert!(!limiter.admit("client").await);
}
