//! Token-bucket rate limiting, one bucket per client.
//!
//! Clients are keyed by bearer subject when present, else by the
//! `x-forwarded-for` address, else a shared anonymous bucket.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use dashmap::DashMap;
use tracing::warn;

use crate::auth::{bearer_from_headers, ServerState};
use crate::errors::ApiError;
use crate::observability;

#[derive(Debug)]
pub struct TokenBucket {
    capacity: u64,
    tokens: u64,
    refill_rate: u64, // tokens per second
    last_refill: Instant,
}

impl TokenBucket {
    pub fn new(capacity: u64, refill_rate: u64) -> Self {
        Self { capacity, tokens: capacity, refill_rate, last_refill: Instant::now() }
    }

    pub fn try_acquire(&mut self, tokens: u64) -> bool {
        self.refill();
        if self.tokens >= tokens {
            self.tokens -= tokens;
            true
        } else {
            false
        }
    }

    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill);
        let tokens_to_add = (elapsed.as_secs_f64() * self.refill_rate as f64) as u64;
        if tokens_to_add > 0 {
            self.tokens = (self.tokens + tokens_to_add).min(self.capacity);
            self.last_refill = now;
        }
    }
}

#[derive(Clone)]
pub struct RateLimiter {
    buckets: Arc<DashMap<String, TokenBucket>>,
    requests_per_second: u64,
    burst: u64,
    enabled: bool,
}

impl RateLimiter {
    pub fn new(requests_per_second: u64, burst: u64, enabled: bool) -> Self {
        Self { buckets: Arc::new(DashMap::new()), requests_per_second, burst, enabled }
    }

    pub fn check(&self, client: &str) -> bool {
        if !self.enabled {
            return true;
        }
        let mut bucket = self
            .buckets
            .entry(client.to_string())
            .or_insert_with(|| TokenBucket::new(self.burst, self.requests_per_second));
        bucket.try_acquire(1)
    }
}

fn client_key(req: &Request) -> String {
    if let Some(token) = bearer_from_headers(req.headers()) {
        // The raw token is a stable per-session key; no need to verify here.
        return format!("tok:{}", token);
    }
    req.headers()
        .get(header::HeaderName::from_static("x-forwarded-for"))
        .and_then(|v| v.to_str().ok())
        .map(|ip| format!("ip:{}", ip))
        .unwrap_or_else(|| "anon".to_string())
}

pub async fn limit(State(state): State<ServerState>, req: Request, next: Next) -> Result<Response, ApiError> {
    let key = client_key(&req);
    if !state.limiter.check(&key) {
        observability::RATE_LIMITED_TOTAL.inc();
        warn!(client = %key, "rate_limited");
        return Err(ApiError::Unavailable("rate limit exceeded, retry later".into()));
    }
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_drains_and_rejects() {
        let mut bucket = TokenBucket::new(10, 5);
        assert!(bucket.try_acquire(5));
        assert!(bucket.try_acquire(5));
        assert!(!bucket.try_acquire(1));
    }

    #[test]
    fn limiter_isolates_clients() {
        let limiter = RateLimiter::new(1, 2, true);
        assert!(limiter.check("a"));
        assert!(limiter.check("a"));
        assert!(!limiter.check("a"));
        // a separate client has its own bucket
        assert!(limiter.check("b"));
    }

    #[test]
    fn disabled_limiter_always_passes() {
        let limiter = RateLimiter::new(1, 1, false);
        for _ in 0..100 {
            assert!(limiter.check("x"));
        }
    }

    #[tokio::test]
    async fn bucket_refills_over_time() {
        let mut bucket = TokenBucket::new(10, 10);
        assert!(bucket.try_acquire(10));
        assert!(!bucket.try_acquire(1));
        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
        assert!(bucket.try_acquire(1));
    }
}
