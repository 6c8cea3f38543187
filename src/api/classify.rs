//! Maps handler errors to client responses and tracker escalations.
//!
//! Classification is a pure function of the error: its explicit status when
//! it has one, its message otherwise. Client-facing text is a fixed sentence
//! per category; raw messages and validation details are only echoed for
//! 400s or outside production.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::error::ApiError;
use crate::config::Environment;
use crate::tracking::{ErrorTracker, Severity, TrackedEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Authentication,
    Authorization,
    NotFound,
    RateLimit,
    ExternalService,
    Internal,
}

impl ErrorKind {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
            ErrorKind::Authorization => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::RateLimit => StatusCode::TOO_MANY_REQUESTS,
            ErrorKind::ExternalService => StatusCode::BAD_GATEWAY,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::BAD_REQUEST => ErrorKind::Validation,
            StatusCode::UNAUTHORIZED => ErrorKind::Authentication,
            StatusCode::FORBIDDEN => ErrorKind::Authorization,
            StatusCode::NOT_FOUND => ErrorKind::NotFound,
            StatusCode::TOO_MANY_REQUESTS => ErrorKind::RateLimit,
            StatusCode::BAD_GATEWAY => ErrorKind::ExternalService,
            _ => ErrorKind::Internal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Authentication => "authentication",
            ErrorKind::Authorization => "authorization",
            ErrorKind::NotFound => "not_found",
            ErrorKind::RateLimit => "rate_limit",
            ErrorKind::ExternalService => "external_service",
            ErrorKind::Internal => "internal",
        }
    }

    /// The sentence shown to clients.
    pub fn public_message(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "Invalid request data",
            ErrorKind::Authentication => "Authentication required",
            ErrorKind::Authorization => "Access denied",
            ErrorKind::NotFound => "Resource not found",
            ErrorKind::RateLimit => "Too many requests. Please try again later.",
            ErrorKind::ExternalService => "A required service is temporarily unavailable. Please try again later.",
            ErrorKind::Internal => "An unexpected error occurred. Please try again later.",
        }
    }

    /// Severity at which this kind is reported, if at all.
    pub fn escalation(&self) -> Option<Severity> {
        match self {
            ErrorKind::Validation | ErrorKind::RateLimit => None,
            kind if kind.status().is_server_error() => Some(Severity::Error),
            _ => Some(Severity::Warning),
        }
    }
}

pub fn classify(err: &ApiError) -> ErrorKind {
    match err.status_code() {
        Some(status) => ErrorKind::from_status(status),
        None => classify_message(&err.to_string()),
    }
}

/// Message patterns, checked in order.
pub fn classify_message(message: &str) -> ErrorKind {
    let message = message.to_lowercase();
    let has = |needle: &str| message.contains(needle);

    if has("validation") {
        ErrorKind::Validation
    } else if has("unauthorized") || has("authentication") {
        ErrorKind::Authentication
    } else if has("forbidden") || has("permission") {
        ErrorKind::Authorization
    } else if has("not found") {
        ErrorKind::NotFound
    } else if has("rate limit") || has("too many requests") {
        ErrorKind::RateLimit
    } else {
        ErrorKind::Internal
    }
}

/// Client-visible failure body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub error: String,
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorEnvelope {
    pub fn build(err: &ApiError, kind: ErrorKind, environment: Environment) -> Self {
        let status = kind.status();
        let disclose = status == StatusCode::BAD_REQUEST || !environment.is_production();
        Self {
            error: kind.public_message().to_string(),
            status_code: status.as_u16(),
            message: disclose.then(|| err.to_string()),
            details: if disclose { err.details() } else { None },
        }
    }
}

/// Turns handler errors into responses, escalating the ones worth a look.
#[derive(Clone)]
pub struct ErrorReporter {
    tracker: Arc<dyn ErrorTracker>,
    environment: Environment,
}

impl ErrorReporter {
    pub fn new(tracker: Arc<dyn ErrorTracker>, environment: Environment) -> Self {
        Self { tracker, environment }
    }

    pub fn respond(&self, endpoint: &str, err: ApiError) -> Response {
        let kind = classify(&err);

        match kind.escalation() {
            Some(severity) => {
                match severity {
                    Severity::Error => error!(endpoint, kind = kind.as_str(), error = %err, "Request failed"),
                    Severity::Warning => warn!(endpoint, kind = kind.as_str(), error = %err, "Request rejected"),
                }
                self.tracker.capture(
                    TrackedEvent::new(severity, err.to_string())
                        .tag("endpoint", endpoint)
                        .tag("kind", kind.as_str()),
                );
            }
            None => debug!(endpoint, kind = kind.as_str(), error = %err, "Request rejected"),
        }

        let envelope = ErrorEnvelope::build(&err, kind, self.environment);
        (kind.status(), Json(envelope)).into_response()
    }

    /// Passes successful responses through and reports failures.
    pub fn finish<T: IntoResponse>(&self, endpoint: &str, result: Result<T, ApiError>) -> Response {
        match result {
            Ok(response) => response.into_response(),
            Err(err) => self.respond(endpoint, err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::FieldErrors;
    use crate::testutils::RecordingTracker;

    #[test]
    fn explicit_status_wins_over_message() {
        let err = ApiError::Internal("validation of the cache failed".into());
        assert_eq!(classify(&err), ErrorKind::Internal);
    }

    #[test]
    fn message_patterns_in_priority_order() {
        let cases = [
            ("Validation error: bad", ErrorKind::Validation),
            ("User unauthorized", ErrorKind::Authentication),
            ("authentication token expired", ErrorKind::Authentication),
            ("Forbidden resource", ErrorKind::Authorization),
            ("missing permission", ErrorKind::Authorization),
            ("Page Not Found", ErrorKind::NotFound),
            ("rate limit hit", ErrorKind::RateLimit),
            ("Too Many Requests", ErrorKind::RateLimit),
            ("validation: not found", ErrorKind::Validation),
            ("forbidden: not found", ErrorKind::Authorization),
            ("connection reset", ErrorKind::Internal),
        ];
        for (message, kind) in cases {
            assert_eq!(classify(&ApiError::Unclassified(message.into())), kind, "{message}");
        }
    }

    #[test]
    fn classification_is_deterministic() {
        let errors = [
            ApiError::Unclassified("Rate limit exceeded".into()),
            ApiError::NotFound("resource brochure".into()),
            ApiError::Unclassified("kaboom".into()),
        ];
        for err in &errors {
            let first = (classify(err), classify(err).public_message());
            for _ in 0..10 {
                assert_eq!((classify(err), classify(err).public_message()), first);
            }
        }
    }

    #[test]
    fn escalation_policy() {
        assert_eq!(ErrorKind::Validation.escalation(), None);
        assert_eq!(ErrorKind::RateLimit.escalation(), None);
        assert_eq!(ErrorKind::Authentication.escalation(), Some(Severity::Warning));
        assert_eq!(ErrorKind::NotFound.escalation(), Some(Severity::Warning));
        assert_eq!(ErrorKind::ExternalService.escalation(), Some(Severity::Error));
        assert_eq!(ErrorKind::Internal.escalation(), Some(Severity::Error));
    }

    #[test]
    fn production_hides_internal_detail() {
        let err = ApiError::Internal("redis password rejected".into());
        let envelope = ErrorEnvelope::build(&err, classify(&err), Environment::Production);
        assert_eq!(envelope.status_code, 500);
        assert_eq!(envelope.message, None);
        assert_eq!(envelope.error, "An unexpected error occurred. Please try again later.");

        let envelope = ErrorEnvelope::build(&err, classify(&err), Environment::Development);
        assert_eq!(envelope.message.as_deref(), Some("internal error: redis password rejected"));
    }

    #[test]
    fn validation_detail_is_always_disclosed() {
        let err = ApiError::Validation(FieldErrors::single("contact.email", "Invalid email address"));
        let envelope = ErrorEnvelope::build(&err, classify(&err), Environment::Production);
        assert_eq!(envelope.status_code, 400);
        assert!(envelope.message.is_some());
        assert_eq!(envelope.details.unwrap()[0]["field"], "contact.email");
    }

    #[test]
    fn forbidden_detail_hidden_in_production() {
        let err = ApiError::Forbidden("bot score too low".into());
        let envelope = ErrorEnvelope::build(&err, classify(&err), Environment::Production);
        assert_eq!(envelope.status_code, 403);
        assert!(envelope.message.is_none());
    }

    #[test]
    fn reporter_escalates_only_actionable_errors() {
        let tracker = Arc::new(RecordingTracker::default());
        let reporter = ErrorReporter::new(tracker.clone(), Environment::Production);

        let response = reporter.respond("rfq", ApiError::RateLimited("rfq".into()));
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        let response = reporter.respond("rfq", ApiError::Validation(FieldErrors::single("a", "b")));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(tracker.events().is_empty());

        reporter.respond(
            "rfq",
            ApiError::ExternalService {
                service: "email",
                message: "timeout".into(),
            },
        );
        reporter.respond("resources", ApiError::NotFound("brochure".into()));
        let events = tracker.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].severity, Severity::Error);
        assert_eq!(events[1].severity, Severity::Warning);
    }
}
