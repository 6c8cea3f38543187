//! Escalation of failures to the external error tracker (Sentry).

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// One event forwarded to the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedEvent {
    pub message: String,
    pub severity: Severity,
    pub tags: Vec<(&'static str, String)>,
}

impl TrackedEvent {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity,
            tags: Vec::new(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn tag(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.tags.push((key, value.into()));
        self
    }
}

pub trait ErrorTracker: Send + Sync {
    fn capture(&self, event: TrackedEvent);
}

/// Forwards events to the process-wide Sentry hub. Without an initialised
/// client (no DSN configured) captures are dropped by the SDK.
#[derive(Debug, Default, Clone)]
pub struct SentryTracker;

impl ErrorTracker for SentryTracker {
    fn capture(&self, event: TrackedEvent) {
        let level = match event.severity {
            Severity::Warning => sentry::Level::Warning,
            Severity::Error => sentry::Level::Error,
        };
        sentry::with_scope(
            |scope| {
                for (key, value) in &event.tags {
                    scope.set_tag(key, value);
                }
            },
            || sentry::capture_message(&event.message, level),
        );
    }
}

/// Initialises the Sentry client. The returned guard flushes on drop and
/// must live as long as the process.
pub fn init_sentry(dsn: Option<&str>, environment: &str) -> Option<sentry::ClientInitGuard> {
    let dsn = dsn.filter(|d| !d.is_empty())?;
    let guard = sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some(environment.to_string().into()),
            ..Default::default()
        },
    ));
    tracing::info!(environment, "Sentry error tracking enabled");
    Some(guard)
}
