use std::collections::HashMap;

use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

/// Stale client entries are swept once the map grows past this bound.
const SWEEP_THRESHOLD: usize = 10_000;

#[derive(Debug)]
struct Window {
    started_at: Instant,
    count: u32,
}

/// Fixed-window admission control, keyed by client identifier. State is a
/// single map behind a mutex; every admission decision is one short
/// critical section with no I/O inside.
pub struct RateLimiter {
    quota: u32,
    window: Duration,
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(quota: u32, window: Duration) -> Self {
        Self {
            quota,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Admits up to `quota` calls per key per window; the window resets
    /// once its length has elapsed.
    pub async fn admit(&self, client_key: &str) -> bool {
        let now = Instant::now();
        let window = self.window;
        let mut windows = self.windows.lock().await;

        if windows.len() > SWEEP_THRESHOLD {
            windows.retain(|_, w| now.duration_since(w.started_at) < window);
        }

        let entry = windows
            .entry(client_key.to_string())
            .or_insert_with(|| Window {
                started_at: now,
                count: 0,
            });

        if now.duration_since(entry.started_at) >= window {
            entry.started_at = now;
            entry.count = 0;
        }

        if entry.count < self.quota {
            entry.count += 1;
            true
        } else {
            false
        }
    }
}
