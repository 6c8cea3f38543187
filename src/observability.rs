//! Logging setup and in-process counters

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogFormat;

/// Installs the global subscriber. `RUST_LOG` overrides the default `info`
/// level. Calling it twice is harmless.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    let registry = tracing_subscriber::registry().with(filter);
    let _ = match format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .try_init(),
    };
}

/// Monotonic counters reported by `/health`. Observational only.
#[derive(Debug, Default)]
pub struct Metrics {
    leads_accepted: AtomicU64,
    rate_limited: AtomicU64,
    bot_rejections: AtomicU64,
    notification_failures: AtomicU64,
    persistence_failures: AtomicU64,
    resource_downloads: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lead_accepted(&self) {
        self.leads_accepted.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "leads_accepted", "Metric incremented");
    }

    pub fn rate_limited(&self) {
        self.rate_limited.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "rate_limited", "Metric incremented");
    }

    pub fn bot_rejected(&self) {
        self.bot_rejections.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "bot_rejections", "Metric incremented");
    }

    pub fn notification_failed(&self) {
        self.notification_failures.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "notification_failures", "Metric incremented");
    }

    pub fn persistence_failed(&self) {
        self.persistence_failures.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "persistence_failures", "Metric incremented");
    }

    pub fn resource_downloaded(&self) {
        self.resource_downloads.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "resource_downloads", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            leads_accepted: self.leads_accepted.load(Ordering::Relaxed),
            rate_limited: self.rate_limited.load(Ordering::Relaxed),
            bot_rejections: self.bot_rejections.load(Ordering::Relaxed),
            notification_failures: self.notification_failures.load(Ordering::Relaxed),
            persistence_failures: self.persistence_failures.load(Ordering::Relaxed),
            resource_downloads: self.resource_downloads.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub leads_accepted: u64,
    pub rate_limited: u64,
    pub bot_rejections: u64,
    pub notification_failures: u64,
    pub persistence_failures: u64,
    pub resource_downloads: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let metrics = Metrics::new();
        metrics.lead_accepted();
        metrics.lead_accepted();
        metrics.rate_limited();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.leads_accepted, 2);
        assert_eq!(snapshot.rate_limited, 1);
        assert_eq!(snapshot.bot_rejections, 0);
    }
}
