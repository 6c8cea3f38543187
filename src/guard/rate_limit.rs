use axum::http::HeaderMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::RateLimitConfig;
use crate::kv::KvStore;
use crate::tracking::{ErrorTracker, TrackedEvent};

const KEY_PREFIX: &str = "rate_limit";

/// Fixed-window request counter kept in the shared store.
///
/// The first increment of a window attaches the expiry, so the counter
/// resets on its own. When the store is unreachable requests are let
/// through: availability wins over strict enforcement.
#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn KvStore>,
    tracker: Arc<dyn ErrorTracker>,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn KvStore>, tracker: Arc<dyn ErrorTracker>, config: RateLimitConfig) -> Self {
        Self { store, tracker, config }
    }

    pub fn key(endpoint: &str, client: &str) -> String {
        format!("{KEY_PREFIX}:{endpoint}:{client}")
    }

    pub fn window(&self) -> Duration {
        self.config.window()
    }

    /// Records one request from `client` against `endpoint` and reports
    /// whether it is within budget.
    pub async fn check(&self, endpoint: &str, client: &str) -> bool {
        let key = Self::key(endpoint, client);
        let max = self.config.max_for(endpoint);

        let count = match self.store.incr(&key).await {
            Ok(count) => count,
            Err(e) => {
                warn!(%key, error = %e, "Rate limit store unavailable, allowing request");
                self.tracker.capture(
                    TrackedEvent::warning(format!("rate limit store failure: {e}"))
                        .tag("endpoint", endpoint),
                );
                return true;
            }
        };

        if count == 1 {
            if let Err(e) = self.store.expire(&key, self.window()).await {
                warn!(%key, error = %e, "Failed to start rate limit window");
                self.tracker.capture(
                    TrackedEvent::warning(format!("rate limit expiry failure: {e}"))
                        .tag("endpoint", endpoint),
                );
            }
        }

        let allowed = count <= i64::from(max);
        debug!(%key, count, max, allowed, "Rate limit checked");
        allowed
    }
}

/// Resolves the client address from proxy headers: the first
/// `x-forwarded-for` hop, then `x-real-ip`, then the shared fallback bucket.
pub fn client_ip(headers: &HeaderMap, fallback_bucket: &str) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    forwarded
        .or_else(real_ip)
        .unwrap_or(fallback_bucket)
        .to_string()
}
