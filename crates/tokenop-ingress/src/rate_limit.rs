//! Sliding-window rate limiting, process-local, keyed per client identity.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub window: Duration,
    pub max_requests: u32,
}

impl RateLimitConfig {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self { window, max_requests }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_millis(60_000),
            max_requests: 100,
        }
    }
}

#[derive(Debug, Default)]
struct Bucket {
    requests: Vec<Instant>,
}

pub struct RateLimiter {
    config: RateLimitConfig,
    buckets: RwLock<HashMap<String, Bucket>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            buckets: RwLock::new(HashMap::new()),
        }
    }

    /// Record a request for `key`, returning `Ok(())` if it fits the
    /// current window or `Err(retry_after)` if the budget is exhausted.
    pub async fn check(&self, key: &str) -> Result<(), Duration> {
        let now = Instant::now();
        let mut buckets = self.buckets.write().await;
        let bucket = buckets.entry(key.to_string()).or_default();

        bucket.requests.retain(|&t| now.duration_since(t) < self.config.window);

        if bucket.requests.len() >= self.config.max_requests as usize {
            let oldest = bucket.requests[0];
            let retry_after = self.config.window.saturating_sub(now.duration_since(oldest));
            return Err(retry_after);
        }

        bucket.requests.push(now);
        Ok(())
    }
}
